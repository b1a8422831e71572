//! The seven abstract layers and the transition grammar between them.

use crate::catalog::ComponentType;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    External,
    Edge,
    Compute,
    DataAccess,
    Storage,
    Async,
    Notification,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::External => "External",
            Layer::Edge => "Edge",
            Layer::Compute => "Compute",
            Layer::DataAccess => "DataAccess",
            Layer::Storage => "Storage",
            Layer::Async => "Async",
            Layer::Notification => "Notification",
        };
        f.write_str(name)
    }
}

impl Layer {
    /// The layer a canonical component type belongs to. Any type not in
    /// the table (including a user-added [`ComponentType::Other`]) is
    /// treated conservatively as `Compute`.
    pub fn of(ty: &ComponentType) -> Layer {
        LAYER_MAP
            .get(ty.canonical_name())
            .copied()
            .unwrap_or(Layer::Compute)
    }

    /// The set of layers traffic is allowed to flow into from this layer.
    pub fn allowed_targets(self) -> &'static HashSet<Layer> {
        ALLOWED_TRANSITIONS.get(&self).expect("every layer has an entry")
    }

    pub fn allows(self, target: Layer) -> bool {
        self.allowed_targets().contains(&target)
    }
}

static LAYER_MAP: Lazy<HashMap<&'static str, Layer>> = Lazy::new(|| {
    use Layer::*;
    HashMap::from([
        ("User", External),
        ("CDN", Edge),
        ("APIGateway", Edge),
        ("LoadBalancer", Edge),
        ("Edge", Edge),
        ("RateLimiter", Edge),
        ("Gateway", Edge),
        ("Server", Compute),
        ("MatchingEngine", Compute),
        ("LocationService", Compute),
        ("TripService", Compute),
        ("TransactionService", Compute),
        ("MLInferenceService", Compute),
        ("RuleEngine", Compute),
        ("IDGenerator", Compute),
        ("InventoryService", Compute),
        ("PaymentGateway", Compute),
        ("InventoryLocking", Compute),
        ("ChatServer", Compute),
        ("Cache", DataAccess),
        ("TokenBucket", DataAccess),
        ("Database", Storage),
        ("FeatureStore", Storage),
        ("MessageStore", Storage),
        ("MediaStore", Storage),
        ("SearchIndex", Storage),
        ("Queue", Async),
        ("EventStream", Async),
        ("Worker", Async),
        ("DistributedSync", Async),
        ("NotificationService", Notification),
    ])
});

static ALLOWED_TRANSITIONS: Lazy<HashMap<Layer, HashSet<Layer>>> = Lazy::new(|| {
    use Layer::*;
    HashMap::from([
        (External, HashSet::from([Edge])),
        (Edge, HashSet::from([Compute])),
        (
            Compute,
            HashSet::from([Compute, DataAccess, Storage, Async, Notification]),
        ),
        (DataAccess, HashSet::from([Storage])),
        (Storage, HashSet::from([Async])),
        (Async, HashSet::from([Async, Storage])),
        (Notification, HashSet::new()),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_lands_in_compute() {
        let other = ComponentType::Other("QuantumOracle".to_string());
        assert_eq!(Layer::of(&other), Layer::Compute);
    }

    #[test]
    fn notification_is_terminal() {
        assert!(Layer::Notification.allowed_targets().is_empty());
    }

    #[test]
    fn external_only_reaches_edge() {
        assert!(Layer::External.allows(Layer::Edge));
        assert!(!Layer::External.allows(Layer::Compute));
    }
}
