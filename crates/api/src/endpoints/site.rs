use crate::error::Result;
use crate::pagination::Paging;
use crate::params::Params;
use crate::types::SmsType;
use crate::{path_segment, ApiClient};

impl ApiClient {
    /// Channels shown on the mobile app home page.
    pub async fn app_channels(&self) -> Result<String> {
        self.get("app/channels", &Params::new()).await
    }

    /// A site settings group such as `site`, `course` or `user`.
    pub async fn settings(&self, name: &str) -> Result<String> {
        self.get(&format!("settings/{}", path_segment(name)?), &Params::new())
            .await
    }

    /// Issues an image captcha; the response carries the image and a `captchaToken`.
    pub async fn create_captcha(&self) -> Result<String> {
        self.post("captcha", &Params::new()).await
    }

    pub async fn verify_captcha(&self, captcha_token: &str, phrase: &str) -> Result<String> {
        let params = Params::new().set("phrase", phrase);
        self.get(&format!("captcha/{}", path_segment(captcha_token)?), &params)
            .await
    }

    pub async fn send_sms(
        &self,
        sms_type: SmsType,
        mobile: &str,
        captcha_token: &str,
        phrase: &str,
    ) -> Result<String> {
        let params = Params::new()
            .set("type", sms_type.as_str())
            .set("mobile", mobile)
            .set("captchaToken", captcha_token)
            .set("phrase", phrase);
        self.post("sms_center", &params).await
    }

    pub async fn notifications(&self, filter: &Params) -> Result<String> {
        self.get("notifications", filter).await
    }

    /// Announcements published after `start_time` (unix seconds, `0` for all).
    pub async fn announcements(&self, start_time: i64, paging: Paging) -> Result<String> {
        let params = Params::from(paging).set("startTime", start_time);
        self.get("announcements", &params).await
    }

    pub async fn article(&self, article_id: u64) -> Result<String> {
        self.get(&format!("articles/{article_id}"), &Params::new())
            .await
    }

    pub async fn articles(&self, filter: &Params) -> Result<String> {
        self.get("articles", filter).await
    }
}
