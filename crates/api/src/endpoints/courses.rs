use crate::error::Result;
use crate::pagination::Paging;
use crate::params::Params;
use crate::types::TaskEvent;
use crate::ApiClient;

impl ApiClient {
    pub async fn course_set(&self, course_set_id: u64) -> Result<String> {
        self.get(&format!("course_sets/{course_set_id}"), &Params::new())
            .await
    }

    /// Searches course sets, e.g. `title`, `sort` (`-studentNum`), `offset`, `limit`.
    pub async fn course_sets(&self, filter: &Params) -> Result<String> {
        self.get("course_sets", filter).await
    }

    /// Most recently joined learners of a course set.
    pub async fn course_set_members(&self, course_set_id: u64, paging: Paging) -> Result<String> {
        self.get(
            &format!("course_sets/{course_set_id}/latest_members"),
            &paging.into(),
        )
        .await
    }

    /// Published courses of a course set.
    pub async fn course_set_courses(&self, course_set_id: u64) -> Result<String> {
        self.get(
            &format!("course_sets/{course_set_id}/courses"),
            &Params::new(),
        )
        .await
    }

    pub async fn course_set_reviews(&self, course_set_id: u64, paging: Paging) -> Result<String> {
        self.get(
            &format!("course_sets/{course_set_id}/reviews"),
            &paging.into(),
        )
        .await
    }

    pub async fn course(&self, course_id: u64) -> Result<String> {
        self.get(&format!("courses/{course_id}"), &Params::new())
            .await
    }

    pub async fn courses(&self, filter: &Params) -> Result<String> {
        self.get("courses", filter).await
    }

    /// Joins a course as a learner.
    pub async fn join_course(&self, course_id: u64) -> Result<String> {
        self.post(&format!("courses/{course_id}/members"), &Params::new())
            .await
    }

    pub async fn course_members(&self, course_id: u64, filter: &Params) -> Result<String> {
        self.get(&format!("courses/{course_id}/members"), filter)
            .await
    }

    pub async fn course_task(&self, course_id: u64, task_id: u64) -> Result<String> {
        self.get(
            &format!("courses/{course_id}/tasks/{task_id}"),
            &Params::new(),
        )
        .await
    }

    /// Table of contents. With `only_published` unpublished tasks are left out.
    pub async fn course_items(&self, course_id: u64, only_published: bool) -> Result<String> {
        let params = Params::new().set("onlyPublished", u8::from(only_published));
        self.get(&format!("courses/{course_id}/items"), &params)
            .await
    }

    pub async fn first_trial_task(&self, course_id: u64) -> Result<String> {
        self.get(
            &format!("courses/{course_id}/trial_tasks/first"),
            &Params::new(),
        )
        .await
    }

    pub async fn course_reviews(&self, course_id: u64, paging: Paging) -> Result<String> {
        self.get(&format!("courses/{course_id}/reviews"), &paging.into())
            .await
    }

    /// Reports task progress. `last_time` is the unix timestamp of the previous report.
    pub async fn task_event(
        &self,
        course_id: u64,
        task_id: u64,
        event: TaskEvent,
        last_time: i64,
    ) -> Result<String> {
        let params = Params::new().set("lastTime", last_time);
        self.patch(
            &format!("courses/{course_id}/tasks/{task_id}/events/{event}"),
            &params,
        )
        .await
    }

    pub async fn course_view(&self, course_id: u64) -> Result<String> {
        self.patch(
            &format!("courses/{course_id}/events/course_view"),
            &Params::new(),
        )
        .await
    }
}
