use crate::domain::analysis::{Question, Subject};
use crate::domain::error::{AppError, Result};
use crate::domain::profile::StudentProfile;
use crate::domain::resource::Resource;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool},
    Pool, Sqlite,
};
use std::str::FromStr;

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub async fn init(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse connection string: {}", e))
            })?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                name TEXT,
                email TEXT,
                university TEXT NOT NULL,
                course TEXT NOT NULL,
                semester TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create profiles table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS resources (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                file_name TEXT NOT NULL,
                storage_path TEXT NOT NULL,
                content_sha256 TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                user_name TEXT,
                subject TEXT NOT NULL,
                topics TEXT NOT NULL,
                summary TEXT NOT NULL,
                questions TEXT NOT NULL,
                uploaded_at DATETIME NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to create resources table: {}", e))
        })?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resources_user ON resources (user_id)")
            .execute(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create index: {}", e)))?;

        Ok(Self { pool })
    }

    pub async fn save_profile(&self, profile: &StudentProfile) -> Result<()> {
        sqlx::query(
            "INSERT INTO profiles (user_id, name, email, university, course, semester, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                university = excluded.university,
                course = excluded.course,
                semester = excluded.semester",
        )
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.university)
        .bind(&profile.course)
        .bind(&profile.semester)
        .bind(profile.created_at.unwrap_or_else(chrono::Utc::now))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save profile: {}", e)))?;

        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<StudentProfile>> {
        sqlx::query_as::<_, ProfileEntity>(
            "SELECT user_id, name, email, university, course, semester, created_at
             FROM profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch profile: {}", e)))
        .map(|entity| entity.map(Into::into))
    }

    /// Inserts a resource record in a single statement.
    pub async fn insert_resource(&self, resource: &Resource) -> Result<()> {
        let topics = to_json(&resource.topics)?;
        let summary = to_json(&resource.summary)?;
        let questions = to_json(&resource.questions)?;

        sqlx::query(
            "INSERT INTO resources (
                id, title, file_name, storage_path, content_sha256, size_bytes,
                user_id, user_name, subject, topics, summary, questions, uploaded_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&resource.id)
        .bind(&resource.title)
        .bind(&resource.file_name)
        .bind(&resource.storage_path)
        .bind(&resource.content_sha256)
        .bind(resource.size_bytes)
        .bind(&resource.user_id)
        .bind(&resource.user_name)
        .bind(resource.subject.label())
        .bind(topics)
        .bind(summary)
        .bind(questions)
        .bind(resource.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save resource: {}", e)))?;

        Ok(())
    }

    /// All resources owned by `user_id`, newest first.
    pub async fn list_resources(&self, user_id: &str) -> Result<Vec<Resource>> {
        let entities = sqlx::query_as::<_, ResourceEntity>(
            "SELECT id, title, file_name, storage_path, content_sha256, size_bytes, user_id,
                    user_name, subject, topics, summary, questions, uploaded_at
             FROM resources WHERE user_id = ? ORDER BY uploaded_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch resources: {}", e)))?;

        entities.into_iter().map(Resource::try_from).collect()
    }

    pub async fn get_resource(&self, id: &str) -> Result<Option<Resource>> {
        let entity = sqlx::query_as::<_, ResourceEntity>(
            "SELECT id, title, file_name, storage_path, content_sha256, size_bytes, user_id,
                    user_name, subject, topics, summary, questions, uploaded_at
             FROM resources WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch resource: {}", e)))?;

        entity.map(Resource::try_from).transpose()
    }

    pub async fn delete_resource(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete resource: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode resource field: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::ParseError(format!("Corrupt {} column: {}", column, e)))
}

// Internal entities for database mapping
#[derive(sqlx::FromRow)]
struct ProfileEntity {
    user_id: String,
    name: Option<String>,
    email: Option<String>,
    university: String,
    course: String,
    semester: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<ProfileEntity> for StudentProfile {
    fn from(e: ProfileEntity) -> Self {
        Self {
            user_id: e.user_id,
            name: e.name,
            email: e.email,
            university: e.university,
            course: e.course,
            semester: e.semester,
            created_at: e.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResourceEntity {
    id: String,
    title: String,
    file_name: String,
    storage_path: String,
    content_sha256: String,
    size_bytes: i64,
    user_id: String,
    user_name: Option<String>,
    subject: String,
    topics: String,
    summary: String,
    questions: String,
    uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ResourceEntity> for Resource {
    type Error = AppError;

    fn try_from(e: ResourceEntity) -> Result<Self> {
        Ok(Self {
            topics: from_json("topics", &e.topics)?,
            summary: from_json("summary", &e.summary)?,
            questions: from_json::<Vec<Question>>("questions", &e.questions)?,
            subject: Subject::from_label(&e.subject),
            id: e.id,
            title: e.title,
            file_name: e.file_name,
            storage_path: e.storage_path,
            content_sha256: e.content_sha256,
            size_bytes: e.size_bytes,
            user_id: e.user_id,
            user_name: e.user_name,
            uploaded_at: e.uploaded_at,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_repository;
    use super::*;
    use crate::domain::analysis::{AnalysisResult, AnswerKey, Difficulty};
    use crate::domain::profile::ProfileInput;
    use crate::domain::resource::NewResource;

    fn new_resource(user_id: &str, title: &str) -> Resource {
        NewResource {
            title: title.to_string(),
            file_name: "notes.pdf".to_string(),
            storage_path: format!("resources/{}/1_notes.pdf", user_id),
            content_sha256: "ab".repeat(32),
            size_bytes: 1024,
            user_id: user_id.to_string(),
            user_name: Some("Asha".to_string()),
            analysis: AnalysisResult {
                subject: Subject::ComputerScience,
                topics: vec!["Graphs".to_string(), "Trees".to_string()],
                summary: vec!["Graphs model pairwise relations".to_string()],
                questions: vec![Question {
                    question_text: "What is a tree?".to_string(),
                    options: vec![
                        "A) Acyclic graph".to_string(),
                        "B) Cycle".to_string(),
                        "C) Queue".to_string(),
                        "D) Heap".to_string(),
                    ],
                    correct_answer: AnswerKey::A,
                    difficulty: Difficulty::Hard,
                }],
            },
        }
        .into_resource()
    }

    #[tokio::test]
    async fn test_profile_upsert() {
        let repo = temp_repository().await;
        assert!(repo.get_profile("u1").await.unwrap().is_none());

        let input = ProfileInput {
            university: "MIT".to_string(),
            course: "EECS".to_string(),
            semester: "Fall".to_string(),
        };
        let profile = StudentProfile::new("u1".to_string(), Some("Asha".to_string()), None, input);
        repo.save_profile(&profile).await.unwrap();

        let mut updated = profile.clone();
        updated.semester = "Spring".to_string();
        repo.save_profile(&updated).await.unwrap();

        let stored = repo.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(stored.university, "MIT");
        assert_eq!(stored.semester, "Spring");
        assert_eq!(stored.name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn test_resource_round_trip_and_ownership() {
        let repo = temp_repository().await;
        let resource = new_resource("u1", "Graph notes");
        repo.insert_resource(&resource).await.unwrap();
        repo.insert_resource(&new_resource("u2", "Other user's notes"))
            .await
            .unwrap();

        let listed = repo.list_resources("u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.title, "Graph notes");
        assert_eq!(stored.subject, Subject::ComputerScience);
        assert_eq!(stored.topics, vec!["Graphs", "Trees"]);
        assert_eq!(stored.questions[0].correct_answer, AnswerKey::A);
        assert_eq!(stored.questions[0].difficulty, Difficulty::Hard);

        let fetched = repo.get_resource(&resource.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, "u1");

        assert!(repo.delete_resource(&resource.id).await.unwrap());
        assert!(!repo.delete_resource(&resource.id).await.unwrap());
        assert!(repo.get_resource(&resource.id).await.unwrap().is_none());
    }
}
