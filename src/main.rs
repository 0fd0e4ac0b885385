use anyhow::Result;
use exam_marking::utils::logging;
use exam_marking::{routes, Config, ExamStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 连接文档库
    let store = ExamStore::connect(&config).await?;

    // 构建路由并启动服务
    let app = routes::create_router(&config, store);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("🚀 服务已启动，监听 {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
