use crate::error::Result;
use crate::params::Params;
use crate::types::{CollectAction, TargetType};
use crate::ApiClient;

// Item bank exercises, goods, certificates and information-collection forms.
impl ApiClient {
    pub async fn item_bank_exercise(&self, exercise_id: u64) -> Result<String> {
        self.get(
            &format!("item_bank_exercises/{exercise_id}"),
            &Params::new(),
        )
        .await
    }

    pub async fn item_bank_exercises(&self, filter: &Params) -> Result<String> {
        self.get("item_bank_exercises", filter).await
    }

    pub async fn item_bank_exercise_modules(&self, exercise_id: u64) -> Result<String> {
        self.get(
            &format!("item_bank_exercises/{exercise_id}/modules"),
            &Params::new(),
        )
        .await
    }

    pub async fn join_item_bank_exercise(&self, exercise_id: u64) -> Result<String> {
        self.post(
            &format!("item_bank_exercises/{exercise_id}/members"),
            &Params::new(),
        )
        .await
    }

    pub async fn goods(&self, goods_id: u64) -> Result<String> {
        self.get(&format!("goods/{goods_id}"), &Params::new()).await
    }

    pub async fn goods_components(&self, goods_id: u64) -> Result<String> {
        self.get(&format!("goods/{goods_id}/components"), &Params::new())
            .await
    }

    pub async fn certificate(&self, certificate_id: u64) -> Result<String> {
        self.get(&format!("certificates/{certificate_id}"), &Params::new())
            .await
    }

    /// The collection event configured for a target, if any.
    pub async fn information_collect_event(
        &self,
        action: CollectAction,
        target_type: TargetType,
        target_id: u64,
    ) -> Result<String> {
        let params = Params::new()
            .set("targetType", target_type.as_str())
            .set("targetId", target_id);
        self.get(&format!("information_collect_event/{action}"), &params)
            .await
    }

    pub async fn information_collect_form(&self, event_id: u64) -> Result<String> {
        self.get(
            &format!("information_collect_form/{event_id}"),
            &Params::new(),
        )
        .await
    }

    /// Submits a filled form. `fields` holds the form's field codes and answers.
    pub async fn submit_information_collect_form(
        &self,
        event_id: u64,
        fields: &Params,
    ) -> Result<String> {
        let params = fields.clone().merge(Params::new().set("eventId", event_id));
        self.post("information_collect_form", &params).await
    }
}
