//! 文档存储 - 基础设施层
//!
//! 持有 MongoDB 句柄，只暴露三个集合的读写能力。
//! 所有入库文档的 `_id` 由存储层分配，对外一律转成字符串。

use mongodb::bson::{self, Bson, Document};
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ExamPaper, ExamResult, StudentResponseRecord};

/// 集合名称与原部署保持一致
const EXAM_QUESTIONS: &str = "examquestions";
const STUDENT_RESPONSES: &str = "studentresponse";
const EXAM_RESULTS: &str = "examresults";

/// 文档存储
#[derive(Clone)]
pub struct ExamStore {
    exam_questions: Collection<Document>,
    student_responses: Collection<Document>,
    exam_results: Collection<Document>,
}

impl ExamStore {
    /// 连接 MongoDB 并绑定三个集合
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let database = client.database(&config.mongo_db);

        info!("✓ 已连接文档库: {}", config.mongo_db);

        Ok(Self {
            exam_questions: database.collection::<Document>(EXAM_QUESTIONS),
            student_responses: database.collection::<Document>(STUDENT_RESPONSES),
            exam_results: database.collection::<Document>(EXAM_RESULTS),
        })
    }

    /// 写入试卷，返回存储层分配的 ID
    pub async fn insert_exam(&self, paper: &ExamPaper) -> AppResult<String> {
        Self::insert_document(&self.exam_questions, bson::to_document(paper)?).await
    }

    /// 写入学生作答记录，返回存储层分配的 ID
    pub async fn insert_student_response(
        &self,
        record: &StudentResponseRecord,
    ) -> AppResult<String> {
        Self::insert_document(&self.student_responses, bson::to_document(record)?).await
    }

    /// 写入整卷批改结果，返回存储层分配的 ID
    pub async fn insert_exam_result(&self, result: &ExamResult) -> AppResult<String> {
        Self::insert_document(&self.exam_results, bson::to_document(result)?).await
    }

    /// 按归属字段查找最先匹配的试卷
    ///
    /// 返回前把文档里的 ObjectId 全部转成字符串
    pub async fn find_exam_by_owner(
        &self,
        owner_field: &str,
        owner_id: &str,
    ) -> AppResult<Option<ExamPaper>> {
        let mut filter = Document::new();
        filter.insert(owner_field, owner_id);

        let Some(document) = self.exam_questions.find_one(filter, None).await? else {
            return Ok(None);
        };

        let document = convert_object_ids(document);
        let paper = bson::from_document(document)?;
        Ok(Some(paper))
    }

    async fn insert_document(
        collection: &Collection<Document>,
        document: Document,
    ) -> AppResult<String> {
        let result = collection.insert_one(document, None).await?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        debug!("✓ 文档已写入 {}，id: {}", collection.name(), id);

        Ok(id)
    }
}

/// 递归地把文档中的 ObjectId 全部替换为十六进制字符串
///
/// 持久化实体对外只暴露字符串形式的 ID，嵌套文档和数组同样处理
pub fn convert_object_ids(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, convert_bson(value)))
        .collect()
}

fn convert_bson(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        Bson::Document(document) => Bson::Document(convert_object_ids(document)),
        Bson::Array(items) => Bson::Array(items.into_iter().map(convert_bson).collect()),
        other => other,
    }
}
