use crate::error::Result;
use crate::pagination::Paging;
use crate::params::Params;
use crate::ApiClient;

impl ApiClient {
    pub async fn classroom(&self, classroom_id: u64) -> Result<String> {
        self.get(&format!("classrooms/{classroom_id}"), &Params::new())
            .await
    }

    pub async fn classrooms(&self, filter: &Params) -> Result<String> {
        self.get("classrooms", filter).await
    }

    pub async fn classroom_courses(&self, classroom_id: u64) -> Result<String> {
        self.get(
            &format!("classrooms/{classroom_id}/courses"),
            &Params::new(),
        )
        .await
    }

    pub async fn classroom_members(&self, classroom_id: u64, paging: Paging) -> Result<String> {
        self.get(&format!("classrooms/{classroom_id}/members"), &paging.into())
            .await
    }

    pub async fn join_classroom(&self, classroom_id: u64) -> Result<String> {
        self.post(
            &format!("classrooms/{classroom_id}/members"),
            &Params::new(),
        )
        .await
    }

    /// Joins through the marketing platform instead of a direct purchase.
    pub async fn join_classroom_via_marketing(&self, classroom_id: u64) -> Result<String> {
        self.post(
            &format!("classrooms/{classroom_id}/marketing_members"),
            &Params::new(),
        )
        .await
    }
}
