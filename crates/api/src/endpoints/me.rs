use serde::Deserialize;

use crate::error::Result;
use crate::pagination::Paging;
use crate::params::Params;
use crate::types::IdentifyType;
use crate::{path_segment, ApiClient};

impl ApiClient {
    /// Exchanges the current (basic) credential for an API token.
    pub async fn access_token(&self) -> Result<String> {
        self.post("tokens", &Params::new()).await
    }

    pub async fn me(&self) -> Result<String> {
        self.get("me", &Params::new()).await
    }

    /// Looks a user up by id, mobile number, email or nickname.
    pub async fn user(&self, identify: &str, identify_type: IdentifyType) -> Result<String> {
        let params = Params::new().set("identifyType", identify_type.as_str());
        self.get(&format!("users/{}", path_segment(identify)?), &params)
            .await
    }

    pub async fn categories(&self, group_code: &str) -> Result<String> {
        self.get(
            &format!("categories/{}", path_segment(group_code)?),
            &Params::new(),
        )
            .await
    }

    pub async fn my_courses(&self, paging: Paging) -> Result<String> {
        self.get("me/courses", &paging.into()).await
    }

    pub async fn my_live_course_sets(&self) -> Result<String> {
        self.get("me/live_course_sets", &Params::new()).await
    }

    pub async fn my_classrooms(&self) -> Result<String> {
        self.get("me/classrooms", &Params::new()).await
    }

    /// Courses of a course set that the current user has joined.
    pub async fn my_course_set_members(&self, course_set_id: u64) -> Result<String> {
        self.get(
            &format!("me/course_sets/{course_set_id}/course_members"),
            &Params::new(),
        )
        .await
    }

    pub async fn my_course_member(&self, course_id: u64) -> Result<String> {
        self.get(&format!("me/course_members/{course_id}"), &Params::new())
            .await
    }

    pub async fn my_course_learning_progress(&self, course_id: u64) -> Result<String> {
        self.get(
            &format!("me/course_learning_progress/{course_id}"),
            &Params::new(),
        )
        .await
    }

    pub async fn my_favorite_course_sets(&self, paging: Paging) -> Result<String> {
        self.get("me/favorite_course_sets", &paging.into()).await
    }

    pub async fn my_favorite_course_set(&self, course_set_id: u64) -> Result<String> {
        self.get(
            &format!("me/favorite_course_sets/{course_set_id}"),
            &Params::new(),
        )
        .await
    }

    pub async fn favorite_course_set(&self, course_set_id: u64) -> Result<String> {
        let params = Params::new().set("courseSetId", course_set_id);
        self.post("me/favorite_course_sets", &params).await
    }

    pub async fn unfavorite_course_set(&self, course_set_id: u64) -> Result<String> {
        self.delete(
            &format!("me/favorite_course_sets/{course_set_id}"),
            &Params::new(),
        )
        .await
    }

    /// Leaves a course. `reason` may be empty.
    pub async fn exit_course(&self, course_id: u64, reason: &str) -> Result<String> {
        let params = Params::new().set("reason", reason);
        self.delete(&format!("me/course_members/{course_id}"), &params)
            .await
    }

    pub async fn my_classroom_member(&self, classroom_id: u64) -> Result<String> {
        self.get(
            &format!("me/classroom_members/{classroom_id}"),
            &Params::new(),
        )
        .await
    }

    pub async fn my_item_bank_exercises(&self, paging: Paging) -> Result<String> {
        self.get("me/item_bank_exercises", &paging.into()).await
    }

    pub async fn my_certificates(&self, paging: Paging) -> Result<String> {
        self.get("me/certificates", &paging.into()).await
    }

    pub async fn my_cash_account(&self) -> Result<String> {
        self.get("me/cash_account", &Params::new()).await
    }

    pub async fn my_orders(&self, paging: Paging) -> Result<String> {
        self.get("me/orders", &paging.into()).await
    }

    pub async fn my_coupons(&self, paging: Paging) -> Result<String> {
        self.get("me/coupons", &paging.into()).await
    }

    pub async fn my_reward_point(&self) -> Result<String> {
        self.get("plugins/reward_point/me/reward_point", &Params::new())
            .await
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

/// Pulls the `token` field out of an [`ApiClient::access_token`] response.
pub fn extract_token(body: &str) -> Result<String> {
    let parsed: TokenBody = serde_json::from_str(body)?;
    Ok(parsed.token)
}
