//! Server-backed collections, request de-duplication and the request log

use std::collections::{BTreeMap, HashMap, HashSet};

use badgeflow::DispatchResult;
use serde_json::Value;
use tracing::{debug, warn};

use super::Stores;
use crate::action::AppAction;
use crate::context::{HttpMethod, RequestContext};
use crate::effect::Effect;
use crate::events::{
    data_updated_for, form_data_updated, API_STORE_FAILURE, DATA_UPDATED, INITIAL_DATA_LOADED,
};
use crate::model::{FilterValue, FormValues, Item, Message};
use crate::stores::form_config::FieldSpec;

const DEFAULT_IDENTIFYING_FIELD: &str = "id";

/// How items of one collection are identified and where it is fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSpec {
    pub identifying_field: String,
    pub fetch: Option<RequestContext>,
}

impl CollectionSpec {
    pub fn new(identifying_field: impl Into<String>) -> Self {
        Self {
            identifying_field: identifying_field.into(),
            fetch: None,
        }
    }

    /// Fetch the whole collection from `url`, replacing the cached items.
    pub fn fetched_from(mut self, key: &str, url: &str) -> Self {
        self.fetch = Some(RequestContext::get(url, key).replacing());
        self
    }

    /// Specs of the collections the badge server exposes.
    pub fn builtin() -> HashMap<String, CollectionSpec> {
        [
            ("earner_badges", Self::new("id").fetched_from("earner_badges", "/v1/earner/badges")),
            (
                "earner_collections",
                Self::new("slug").fetched_from("earner_collections", "/v1/earner/collections"),
            ),
            (
                "issuer_issuers",
                Self::new("id").fetched_from("issuer_issuers", "/v1/issuer/issuers"),
            ),
            (
                "issuer_badgeclasses",
                Self::new("id").fetched_from("issuer_badgeclasses", "/v1/issuer/all-badges"),
            ),
            // Assertions are listed per badge class through API_GET_DATA
            ("issuer_badgeinstances", Self::new("id")),
        ]
        .into_iter()
        .map(|(key, spec)| (key.to_string(), spec))
        .collect()
    }
}

#[derive(Debug)]
pub struct ApiStore {
    specs: HashMap<String, CollectionSpec>,
    data: HashMap<String, Vec<Item>>,
    active_get_requests: HashSet<String>,
    request_log: Vec<String>,
    last_failure: Option<Message>,
}

impl Default for ApiStore {
    fn default() -> Self {
        Self::new(CollectionSpec::builtin())
    }
}

impl ApiStore {
    pub fn new(specs: HashMap<String, CollectionSpec>) -> Self {
        Self {
            specs,
            data: HashMap::new(),
            active_get_requests: HashSet::new(),
            request_log: Vec::new(),
            last_failure: None,
        }
    }

    pub fn with_collection(mut self, key: impl Into<String>, spec: CollectionSpec) -> Self {
        self.specs.insert(key.into(), spec);
        self
    }

    pub fn identifying_field(&self, key: &str) -> &str {
        self.specs
            .get(key)
            .map_or(DEFAULT_IDENTIFYING_FIELD, |spec| spec.identifying_field.as_str())
    }

    // ===== Getters =====

    /// Cached items of `key`, empty when never fetched.
    pub fn get_collection(&self, key: &str) -> &[Item] {
        self.data.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether every collection in `keys` has been fetched at least once.
    pub fn collections_exist<I, K>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().all(|key| self.data.contains_key(key.as_ref()))
    }

    pub fn get_first_item_by_property_value(
        &self,
        key: &str,
        property: &str,
        value: &Value,
    ) -> Option<&Item> {
        self.data
            .get(key)?
            .iter()
            .find(|item| item.get(property) == Some(value))
    }

    /// Items of `key` whose `property` matches. An unseen collection becomes
    /// an existing, empty one.
    pub fn filter(
        &mut self,
        key: &str,
        property: &str,
        value: impl Into<FilterValue>,
    ) -> Vec<Item> {
        let value = value.into();
        self.data
            .entry(key.to_string())
            .or_default()
            .iter()
            .filter(|item| item.get(property).is_some_and(|v| value.matches(v)))
            .cloned()
            .collect()
    }

    pub fn is_fetching(&self, key: &str) -> bool {
        self.active_get_requests.contains(key)
    }

    /// GET paths issued so far, in order.
    pub fn request_log(&self) -> &[String] {
        &self.request_log
    }

    pub fn has_requested(&self, path: &str) -> bool {
        self.request_log.iter().any(|p| p == path)
    }

    /// Message describing the most recent failed request.
    pub fn last_failure(&self) -> Option<&Message> {
        self.last_failure.as_ref()
    }

    // ===== Mutations =====

    fn position_of(&self, key: &str, item: &Item) -> Option<usize> {
        let field = self.identifying_field(key);
        let id = item.get(field).filter(|id| !id.is_null())?;
        self.data
            .get(key)?
            .iter()
            .position(|existing| existing.get(field) == Some(id))
    }

    /// Append `item`, or replace it in place when `is_new` is set or its
    /// identifying value is already present.
    pub fn add_collection_item(&mut self, key: &str, item: Item, is_new: bool) -> &Item {
        if is_new || self.position_of(key, &item).is_some() {
            return self.replace_collection_item(key, item);
        }
        let collection = self.data.entry(key.to_string()).or_default();
        collection.push(item);
        &collection[collection.len() - 1]
    }

    /// Remove the item sharing `item`'s identifying value.
    pub fn remove_collection_item(&mut self, key: &str, item: &Item) -> Option<Item> {
        let index = self.position_of(key, item)?;
        self.data.get_mut(key).map(|collection| collection.remove(index))
    }

    /// Overwrite the item with the same identifying value, or append.
    pub fn replace_collection_item(&mut self, key: &str, item: Item) -> &Item {
        let position = self.position_of(key, &item);
        let collection = self.data.entry(key.to_string()).or_default();
        let index = match position {
            Some(index) => {
                collection[index] = item;
                index
            }
            None => {
                collection.push(item);
                collection.len() - 1
            }
        };
        &collection[index]
    }

    /// Set `update_key` on the first item whose `search_key` equals
    /// `search_value`. `None` when no such item exists.
    pub fn partial_update_collection_item(
        &mut self,
        key: &str,
        search_key: &str,
        search_value: &Value,
        update_key: &str,
        update_value: Value,
    ) -> Option<&Item> {
        let item = self
            .data
            .get_mut(key)?
            .iter_mut()
            .find(|item| item.get(search_key) == Some(search_value))?;
        item.as_object_mut()?.insert(update_key.to_string(), update_value);
        Some(&*item)
    }

    /// Record the GET and mark its collection in flight.
    pub fn get_data(&mut self, context: RequestContext) -> Effect {
        self.active_get_requests.insert(context.api_collection_key.clone());
        self.request_log.push(context.action_url.clone());
        Effect::GetData(context)
    }

    pub fn post_form(
        &self,
        form_id: &str,
        fields: Vec<FieldSpec>,
        values: FormValues,
        context: RequestContext,
        success_message: String,
    ) -> Effect {
        Effect::PostForm {
            form_id: form_id.to_string(),
            fields,
            values,
            context,
            success_message,
        }
    }

    pub fn request_data(&self, data: Option<Value>, context: RequestContext) -> Effect {
        Effect::RequestData { data, context }
    }

    /// GET effects for every registered collection in `keys` not already in flight.
    pub fn fetch_collections<I, K>(&mut self, keys: I) -> Vec<Effect>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut effects = Vec::new();
        for key in keys {
            let key = key.as_ref();
            let Some(context) = self.specs.get(key).and_then(|spec| spec.fetch.clone()) else {
                debug!(collection = %key, "No fetch context registered");
                continue;
            };
            if self.is_fetching(key) {
                debug!(collection = %key, "Fetch already in flight");
                continue;
            }
            effects.push(self.get_data(context));
        }
        effects
    }

    // ===== Completions =====

    fn load(&mut self, context: &RequestContext, body: &Value) {
        let key = context.api_collection_key.as_str();
        if context.replace_collection || !self.data.contains_key(key) {
            self.data.insert(key.to_string(), Vec::new());
        }
        match body {
            Value::Array(items) => {
                for item in items {
                    self.add_collection_item(key, item.clone(), false);
                }
            }
            Value::Null => {}
            other => {
                self.add_collection_item(key, other.clone(), false);
            }
        }
    }

    fn load_initial_data(&mut self, initial_data: &BTreeMap<String, Vec<Item>>) {
        for (key, items) in initial_data {
            self.data.insert(key.clone(), Vec::new());
            for item in items {
                self.add_collection_item(key, item.clone(), false);
            }
        }
    }

    fn record_failure(&mut self, message: Message) {
        warn!(message = %message.content, "API request failed");
        self.last_failure = Some(message);
    }
}

fn collection_updated(key: &str) -> DispatchResult<Effect> {
    DispatchResult::changed()
        .emit(DATA_UPDATED)
        .emit(data_updated_for(key))
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    match action {
        AppAction::AppWillMount { bootstrap } => {
            stores.api.load_initial_data(&bootstrap.initial_data);
            DispatchResult::changed()
                .emit(DATA_UPDATED)
                .emit(INITIAL_DATA_LOADED)
        }

        AppAction::FormSubmit { form_id, form_type, params } => {
            // FormStore ran first and only accepts a submit from `ready`
            if stores.forms.accepted_submit() != Some(form_id.as_str()) {
                return DispatchResult::unchanged();
            }
            let (Some(record), Some(config)) = (
                stores.forms.get_form(form_id),
                stores.form_config.config(*form_type),
            ) else {
                return DispatchResult::unchanged();
            };
            match stores.form_config.request_context(*form_type, params, form_id) {
                Ok(context) => DispatchResult::effect(stores.api.post_form(
                    form_id,
                    record.fields_meta.clone(),
                    record.form_state.values.clone(),
                    context,
                    config.success_message.clone(),
                )),
                Err(e) => {
                    warn!(form_id = %form_id, error = %e, "Cannot submit form");
                    DispatchResult::unchanged()
                }
            }
        }

        AppAction::ApiSubmitData { data, context } => {
            DispatchResult::effect(stores.api.request_data(data.clone(), context.clone()))
        }

        AppAction::ApiGetData { context } => {
            if stores.api.has_requested(&context.action_url) && !context.replace_collection {
                debug!(url = %context.action_url, "Already requested, skipping");
                return DispatchResult::unchanged();
            }
            DispatchResult::effect(stores.api.get_data(context.clone()))
        }

        AppAction::ApiFetchCollections { keys } => {
            DispatchResult::effects(stores.api.fetch_collections(keys))
        }

        AppAction::ApiGetDataDidLoad { context, body } => {
            let key = context.api_collection_key.as_str();
            stores.api.active_get_requests.remove(key);
            stores.api.load(context, body);
            collection_updated(key)
        }

        AppAction::ApiGetDataDidFail { context, failure } => {
            stores
                .api
                .active_get_requests
                .remove(context.api_collection_key.as_str());
            stores.api.record_failure(failure.message("getting data"));
            DispatchResult::changed().emit(API_STORE_FAILURE)
        }

        AppAction::ApiFormResultSuccess { context, result, .. } => {
            let key = context.api_collection_key.as_str();
            match context.method {
                // A DELETE answer, if any, names the removed item
                HttpMethod::Delete => {
                    if stores.api.remove_collection_item(key, result).is_none() {
                        return DispatchResult::unchanged();
                    }
                }
                // 204 and other empty bodies carry nothing to cache
                _ if result.is_null() => return DispatchResult::unchanged(),
                HttpMethod::Put => {
                    stores.api.replace_collection_item(key, result.clone());
                }
                _ => {
                    stores.api.add_collection_item(key, result.clone(), false);
                }
            }
            collection_updated(key)
        }

        AppAction::ApiSubmitDataDidSucceed { context, body } => {
            let key = context.api_collection_key.as_str();
            if let Some(update) = &context.partial_update {
                let value = update.update_value.clone().unwrap_or_else(|| body.clone());
                let updated = stores.api.partial_update_collection_item(
                    key,
                    &update.search_key,
                    &update.search_value,
                    &update.update_key,
                    value,
                );
                if updated.is_none() {
                    debug!(
                        collection = %key,
                        search_key = %update.search_key,
                        "No item to update"
                    );
                    return DispatchResult::unchanged().emit(API_STORE_FAILURE);
                }
            }
            let mut result = collection_updated(key);
            if let Some(form_id) = &context.form_id {
                result = result.emit(form_data_updated(form_id));
            }
            result
        }

        AppAction::ApiSubmitDataDidFail { failure, .. } => {
            stores.api.record_failure(failure.message("submitting data"));
            DispatchResult::changed().emit(API_STORE_FAILURE)
        }

        _ => DispatchResult::unchanged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PartialUpdate;
    use serde_json::json;

    fn loaded(store: &mut ApiStore, key: &str, body: Value) {
        let context = RequestContext::get("/unused", key).replacing();
        store.load(&context, &body);
    }

    #[test]
    fn test_unseen_collection_is_empty_and_missing() {
        let store = ApiStore::default();
        assert!(store.get_collection("earner_badges").is_empty());
        assert!(!store.collections_exist(["earner_badges"]));
        assert!(store.collections_exist(Vec::<String>::new()));
    }

    #[test]
    fn test_filter_registers_empty_collection() {
        let mut store = ApiStore::default();
        assert!(store.filter("issuer_issuers", "id", 1).is_empty());
        assert!(store.collections_exist(["issuer_issuers"]));
        assert!(store.get_collection("issuer_issuers").is_empty());
    }

    #[test]
    fn test_add_keeps_identifying_values_unique() {
        let mut store = ApiStore::default();
        store.add_collection_item("earner_badges", json!({ "id": 1, "name": "A" }), false);
        store.add_collection_item("earner_badges", json!({ "id": 2, "name": "B" }), false);
        let replaced = store
            .add_collection_item("earner_badges", json!({ "id": 1, "name": "A2" }), false)
            .clone();

        assert_eq!(replaced["name"], "A2");
        let items = store.get_collection("earner_badges");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "A2");
    }

    #[test]
    fn test_items_without_identifier_append() {
        let mut store = ApiStore::default();
        store.add_collection_item("earner_badges", json!({ "name": "anon" }), false);
        store.add_collection_item("earner_badges", json!({ "name": "anon" }), false);
        assert_eq!(store.get_collection("earner_badges").len(), 2);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut store = ApiStore::default();
        let item = json!({ "slug": "favorites", "name": "Favorites" });
        store.replace_collection_item("earner_collections", item.clone());
        store.replace_collection_item("earner_collections", item.clone());

        assert_eq!(store.get_collection("earner_collections"), &[item]);
    }

    #[test]
    fn test_collection_identified_by_slug() {
        let mut store = ApiStore::default();
        store.add_collection_item("earner_collections", json!({ "slug": "a", "id": 1 }), false);
        store.add_collection_item("earner_collections", json!({ "slug": "b", "id": 1 }), false);
        assert_eq!(store.identifying_field("earner_collections"), "slug");
        assert_eq!(store.get_collection("earner_collections").len(), 2);
    }

    #[test]
    fn test_registered_collection_spec() {
        let mut store = ApiStore::default().with_collection(
            "issuer_staff",
            CollectionSpec::new("username").fetched_from("issuer_staff", "/v1/issuer/staff"),
        );
        assert_eq!(store.identifying_field("issuer_staff"), "username");
        assert_eq!(store.identifying_field("unknown"), "id");

        store.add_collection_item("issuer_staff", json!({ "username": "ann", "role": "a" }), false);
        store.add_collection_item("issuer_staff", json!({ "username": "ann", "role": "b" }), false);
        assert_eq!(
            store.get_collection("issuer_staff"),
            &[json!({ "username": "ann", "role": "b" })]
        );

        let effects = store.fetch_collections(["issuer_staff"]);
        assert!(matches!(
            &effects[0],
            Effect::GetData(ctx) if ctx.action_url == "/v1/issuer/staff"
        ));
    }

    #[test]
    fn test_remove_collection_item() {
        let mut store = ApiStore::default();
        loaded(&mut store, "issuer_badgeclasses", json!([{ "id": 1 }, { "id": 2 }]));

        assert_eq!(
            store.remove_collection_item("issuer_badgeclasses", &json!({ "id": 1 })),
            Some(json!({ "id": 1 }))
        );
        assert!(store.remove_collection_item("issuer_badgeclasses", &Value::Null).is_none());
        assert_eq!(store.get_collection("issuer_badgeclasses"), &[json!({ "id": 2 })]);
    }

    #[test]
    fn test_first_item_by_property_value() {
        let mut store = ApiStore::default();
        loaded(&mut store, "issuer_badgeclasses", json!([
            { "id": 1, "issuer": "acme" },
            { "id": 2, "issuer": "globex" },
            { "id": 3, "issuer": "globex" }
        ]));

        let found = store
            .get_first_item_by_property_value("issuer_badgeclasses", "issuer", &json!("globex"))
            .unwrap();
        assert_eq!(found["id"], 2);
        assert!(store
            .get_first_item_by_property_value("issuer_badgeclasses", "issuer", &json!("initech"))
            .is_none());
        assert!(store
            .get_first_item_by_property_value("unknown", "id", &json!(1))
            .is_none());
    }

    #[test]
    fn test_partial_update() {
        let mut store = ApiStore::default();
        loaded(&mut store, "earner_collections", json!([{ "slug": "a", "badges": [] }]));

        let updated = store
            .partial_update_collection_item(
                "earner_collections",
                "slug",
                &json!("a"),
                "badges",
                json!([{ "id": 5 }]),
            )
            .cloned();
        assert_eq!(updated.unwrap()["badges"], json!([{ "id": 5 }]));

        assert!(store
            .partial_update_collection_item(
                "earner_collections",
                "slug",
                &json!("zz"),
                "badges",
                json!([])
            )
            .is_none());
    }

    #[test]
    fn test_load_replaces_or_merges() {
        let mut store = ApiStore::default();
        loaded(&mut store, "earner_badges", json!([{ "id": 1 }, { "id": 2 }]));

        let merging = RequestContext::get("/v1/earner/badges", "earner_badges");
        store.load(&merging, &json!({ "id": 3 }));
        assert_eq!(store.get_collection("earner_badges").len(), 3);

        loaded(&mut store, "earner_badges", json!([{ "id": 9 }]));
        assert_eq!(store.get_collection("earner_badges"), &[json!({ "id": 9 })]);
    }

    #[test]
    fn test_fetch_collections_skips_in_flight_and_unregistered() {
        let mut store = ApiStore::default();

        let first = store.fetch_collections(["earner_badges", "issuer_badgeinstances", "nope"]);
        assert_eq!(first.len(), 1);
        assert!(matches!(
            &first[0],
            Effect::GetData(ctx) if ctx.action_url == "/v1/earner/badges" && ctx.replace_collection
        ));
        assert!(store.is_fetching("earner_badges"));

        assert!(store.fetch_collections(["earner_badges"]).is_empty());
        assert_eq!(store.request_log(), &["/v1/earner/badges".to_string()]);
    }

    #[test]
    fn test_request_data_effect_carries_context() {
        let update = PartialUpdate {
            search_key: "id".into(),
            search_value: json!(4),
            update_key: "revoked".into(),
            update_value: Some(json!(true)),
        };
        let context = RequestContext::get(
            "/v1/issuer/issuers/acme/badges/gold/assertions/4",
            "issuer_badgeinstances",
        )
            .with_method(HttpMethod::Delete)
            .with_partial_update(update.clone());
        let store = ApiStore::default();

        assert_eq!(
            store.request_data(None, context.clone()),
            Effect::RequestData { data: None, context }
        );
    }
}
