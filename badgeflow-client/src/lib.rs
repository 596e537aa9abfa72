//! Stores, actions and HTTP effects for an Open Badges web client
//!
//! ```ignore
//! let mut app = App::new(&ClientConfig::default().with_base_url("https://badges.example.org"))?;
//! let mut badges = app.subscribe(events::data_updated_for("earner_badges"));
//!
//! app.actions().fetch_collections(["earner_badges", "earner_collections"]);
//! app.run_until_idle().await;
//!
//! for badge in app.stores().api.get_collection("earner_badges") {
//!     println!("{}", badge["json"]["badge"]["name"]);
//! }
//! ```

pub mod action;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod creators;
pub mod effect;
pub mod error;
pub mod events;
pub mod model;
pub mod stores;
pub mod transport;

pub use badgeflow::{drain_events, Subscription};

pub use action::{ApiFailure, AppAction};
pub use app::{dispatcher, App, AppDispatcher, AppRuntime};
pub use bootstrap::Bootstrap;
pub use config::ClientConfig;
pub use context::{HttpMethod, PartialUpdate, RequestContext};
pub use creators::{classify_href, ActionCreators, HrefKind};
pub use effect::{Effect, EffectRunner};
pub use error::ClientError;
pub use model::{
    FieldValue, FileUpload, FilterValue, FormId, FormValues, Item, Message, MessageKind, UrlParams,
};
pub use stores::Stores;
pub use transport::{
    ApiRequest, ApiResponse, FormPart, MockTransport, RequestBody, ReqwestTransport, Transport,
    TransportError,
};
