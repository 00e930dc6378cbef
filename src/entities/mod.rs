//! Entity type definitions
//!
//! **Service desk:**
//! - [`Ticket`] - requests raised by users, with SLA deadlines
//! - [`Comment`], [`ActivityEvent`], [`Attachment`] - per-entity annotation log
//!
//! **Maintenance:**
//! - [`Asset`] - tracked equipment
//! - [`WorkOrder`] - corrective and planned jobs against assets
//! - [`PmPlan`] - recurring preventive maintenance schedules
//!
//! **Procurement:**
//! - [`Supplier`], [`Rfq`], [`Quote`], [`PurchaseOrder`]
//!
//! **Organisation:**
//! - [`User`], [`Site`], [`Location`], [`Notification`], [`AppSettings`]
//!
//! All of them live inside the [`AppData`] aggregate.

pub mod annotation;
pub mod app_data;
pub mod asset;
pub mod notification;
pub mod pm_plan;
pub mod po;
pub mod quote;
pub mod rfq;
pub mod settings;
pub mod site;
pub mod supplier;
pub mod ticket;
pub mod user;
pub mod work_order;

pub use annotation::{ActivityEvent, ActivityType, Annotation, Attachment, Comment};
pub use app_data::{AppData, CURRENT_VERSION};
pub use asset::{Asset, AssetPatch, AssetStatus};
pub use notification::{Notification, NotificationType};
pub use pm_plan::{PmFrequency, PmPlan, PmPlanPatch};
pub use po::{PoStatus, PurchaseOrder, PurchaseOrderPatch};
pub use quote::{Quote, QuoteLine, QuotePatch, QuoteStatus};
pub use rfq::{Rfq, RfqPatch, RfqStatus};
pub use settings::{AppSettings, SlaPolicy};
pub use site::{Location, Site};
pub use supplier::{Supplier, SupplierPatch};
pub use ticket::{Ticket, TicketCategory, TicketPatch, TicketStatus};
pub use user::{User, UserRole};
pub use work_order::{
    ChecklistItem, PartUsed, WorkOrder, WorkOrderPatch, WorkOrderStatus, WorkOrderType,
};
