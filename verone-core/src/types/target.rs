//! 持久化目标实体

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Kind of back-office record an editor writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Organisation,
    Contact,
    SalesOrder,
    PurchaseOrder,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Organisation => "organisation",
            Self::Contact => "contact",
            Self::SalesOrder => "sales_order",
            Self::PurchaseOrder => "purchase_order",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one record an editor is bound to for its whole lifetime.
///
/// Every section save of that editor goes to this record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum BackingTarget {
    Product(String),
    Organisation(String),
    Contact(String),
    SalesOrder(String),
    PurchaseOrder(String),
}

impl BackingTarget {
    /// Build a target from a kind and an id, rejecting blank ids.
    pub fn new(kind: EntityKind, id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::ValidationError(format!(
                "{kind} id cannot be empty"
            )));
        }
        Ok(match kind {
            EntityKind::Product => Self::Product(id),
            EntityKind::Organisation => Self::Organisation(id),
            EntityKind::Contact => Self::Contact(id),
            EntityKind::SalesOrder => Self::SalesOrder(id),
            EntityKind::PurchaseOrder => Self::PurchaseOrder(id),
        })
    }

    /// Resolve the optional ids pages pass around into a single target.
    ///
    /// Priority is product, organisation, contact, sales order, purchase order;
    /// the first non-empty id wins. No id at all is an error.
    pub fn from_ids(ids: EntityIds) -> CoreResult<Self> {
        let candidates = [
            (EntityKind::Product, ids.product_id),
            (EntityKind::Organisation, ids.organisation_id),
            (EntityKind::Contact, ids.contact_id),
            (EntityKind::SalesOrder, ids.sales_order_id),
            (EntityKind::PurchaseOrder, ids.purchase_order_id),
        ];
        let mut present = candidates
            .into_iter()
            .filter_map(|(kind, id)| id.filter(|id| !id.trim().is_empty()).map(|id| (kind, id)));

        let (kind, id) = present.next().ok_or(CoreError::NoTarget)?;
        let ignored: Vec<EntityKind> = present.map(|(kind, _)| kind).collect();
        if !ignored.is_empty() {
            log::warn!("Several ids supplied, {kind} {id} wins over {ignored:?}");
        }
        Self::new(kind, id)
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Product(_) => EntityKind::Product,
            Self::Organisation(_) => EntityKind::Organisation,
            Self::Contact(_) => EntityKind::Contact,
            Self::SalesOrder(_) => EntityKind::SalesOrder,
            Self::PurchaseOrder(_) => EntityKind::PurchaseOrder,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Product(id)
            | Self::Organisation(id)
            | Self::Contact(id)
            | Self::SalesOrder(id)
            | Self::PurchaseOrder(id) => id,
        }
    }
}

impl fmt::Display for BackingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Optional record ids, as detail pages hold them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIds {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub organisation_id: Option<String>,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub sales_order_id: Option<String>,
    #[serde(default)]
    pub purchase_order_id: Option<String>,
}
