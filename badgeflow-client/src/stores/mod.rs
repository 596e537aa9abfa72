//! Application stores
//!
//! Every store owns its private state and is mutated only by its handler.
//! [`Stores`] aggregates them and is the dispatcher's state.

pub mod active_action;
pub mod api;
pub mod form;
pub mod form_config;
pub mod menu;
pub mod route;
pub mod user;

pub use active_action::{ActiveActionStore, ActivePanel};
pub use api::{ApiStore, CollectionSpec};
pub use form::{ActionState, FormRecord, FormState, FormStore};
pub use form_config::{FieldKind, FieldSpec, FormConfig, FormConfigStore, FormType};
pub use menu::{MenuItem, MenuStore, Menus};
pub use route::RouteStore;
pub use user::{UserProfile, UserStore};

#[derive(Debug, Default)]
pub struct Stores {
    pub api: ApiStore,
    pub forms: FormStore,
    pub form_config: FormConfigStore,
    pub active_action: ActiveActionStore,
    pub route: RouteStore,
    pub user: UserStore,
    pub menu: MenuStore,
}
