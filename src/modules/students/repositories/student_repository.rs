use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::students::models::{Student, StudentStatus};

#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn Repository<Student>>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn Repository<Student>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, student: Student) -> Result<Student> {
        self.store.create(student).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Student>> {
        self.store.find_by_id(id).await
    }

    /// Like `find_by_id` but a missing student is NotFound
    pub async fn require(&self, id: &str) -> Result<Student> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {}", id)))
    }

    pub async fn update(&self, student: Student) -> Result<Student> {
        self.store.update(student).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        self.store.list().await
    }

    pub async fn list_by_status(&self, status: StudentStatus) -> Result<Vec<Student>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|s| s.status == status)
            .collect())
    }
}
