//! Canonical component types and the free-form-to-canonical alias table.
//!
//! Component types arrive as free-form strings (`"redis"`, `"Load Balancer"`,
//! `"event_queue"`, ...). [`ComponentType::normalize`] folds them down to a
//! closed set; anything unrecognized survives as-is via
//! [`ComponentType::Other`] so a UI can still render a palette entry for it
//! (forward-compatible fallback, per the design notes).

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// The closed set of canonical component types, plus a raw-string fallback
/// for anything the alias table does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentType {
    User,
    Cdn,
    ApiGateway,
    LoadBalancer,
    Edge,
    RateLimiter,
    Gateway,
    Server,
    MatchingEngine,
    LocationService,
    TripService,
    TransactionService,
    MlInferenceService,
    RuleEngine,
    IdGenerator,
    InventoryService,
    PaymentGateway,
    InventoryLocking,
    ChatServer,
    Cache,
    FeatureStore,
    TokenBucket,
    Database,
    MessageStore,
    MediaStore,
    SearchIndex,
    Queue,
    EventStream,
    Worker,
    DistributedSync,
    NotificationService,
    /// A type string that did not match any alias or canonical name. Kept
    /// verbatim (trimmed) so UI palettes stay forward-compatible with
    /// component types the core does not yet recognize.
    Other(String),
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl ComponentType {
    /// The canonical spelling for this type, as it appears on the wire and
    /// in error/warning text.
    pub fn canonical_name(&self) -> &str {
        match self {
            ComponentType::User => "User",
            ComponentType::Cdn => "CDN",
            ComponentType::ApiGateway => "APIGateway",
            ComponentType::LoadBalancer => "LoadBalancer",
            ComponentType::Edge => "Edge",
            ComponentType::RateLimiter => "RateLimiter",
            ComponentType::Gateway => "Gateway",
            ComponentType::Server => "Server",
            ComponentType::MatchingEngine => "MatchingEngine",
            ComponentType::LocationService => "LocationService",
            ComponentType::TripService => "TripService",
            ComponentType::TransactionService => "TransactionService",
            ComponentType::MlInferenceService => "MLInferenceService",
            ComponentType::RuleEngine => "RuleEngine",
            ComponentType::IdGenerator => "IDGenerator",
            ComponentType::InventoryService => "InventoryService",
            ComponentType::PaymentGateway => "PaymentGateway",
            ComponentType::InventoryLocking => "InventoryLocking",
            ComponentType::ChatServer => "ChatServer",
            ComponentType::Cache => "Cache",
            ComponentType::FeatureStore => "FeatureStore",
            ComponentType::TokenBucket => "TokenBucket",
            ComponentType::Database => "Database",
            ComponentType::MessageStore => "MessageStore",
            ComponentType::MediaStore => "MediaStore",
            ComponentType::SearchIndex => "SearchIndex",
            ComponentType::Queue => "Queue",
            ComponentType::EventStream => "EventStream",
            ComponentType::Worker => "Worker",
            ComponentType::DistributedSync => "DistributedSync",
            ComponentType::NotificationService => "NotificationService",
            ComponentType::Other(raw) => raw,
        }
    }

    /// Normalize a free-form type string: trim, lowercase, collapse spaces
    /// and dashes to underscores, then look up the alias table. Falls back
    /// to the raw trimmed value when unrecognized; an empty/missing type
    /// normalizes to `Server`.
    pub fn normalize(raw: &str) -> ComponentType {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ComponentType::Server;
        }
        let key: String = trimmed
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        let key = key.replace('_', "");
        match TYPE_ALIASES.get(key.as_str()) {
            Some(canonical) => canonical.clone(),
            None => ComponentType::Other(trimmed.to_string()),
        }
    }

    /// All canonical types, in declaration order — used to render a
    /// component palette. Does not include `Other`, which has no fixed
    /// member.
    pub fn all() -> &'static [ComponentType] {
        &ALL_CANONICAL
    }
}

/// The original source normalizes by stripping spaces and underscorizing
/// dashes *before* alias lookup, but its alias keys are themselves written
/// without separators (`"api_gateway"` and `"apigateway"` both map to
/// `APIGateway`). We fold both the space/dash-stripped and already-bare
/// spellings into one alias key space by also stripping underscores from
/// the lookup key, so `"API Gateway"`, `"api-gateway"`, `"api_gateway"` and
/// `"apigateway"` all resolve identically.
static TYPE_ALIASES: Lazy<HashMap<&'static str, ComponentType>> = Lazy::new(|| {
    use ComponentType::*;
    HashMap::from([
        ("user", User),
        ("cdn", Cdn),
        ("apigateway", ApiGateway),
        ("loadbalancer", LoadBalancer),
        ("edge", Edge),
        ("ratelimiter", RateLimiter),
        ("server", Server),
        ("appserver", Server),
        ("matchingengine", MatchingEngine),
        ("locationservice", LocationService),
        ("tripservice", TripService),
        ("transactionservice", TransactionService),
        ("mlinferenceservice", MlInferenceService),
        ("mlservice", MlInferenceService),
        ("ruleengine", RuleEngine),
        ("idgenerator", IdGenerator),
        ("inventoryservice", InventoryService),
        ("paymentgateway", PaymentGateway),
        ("inventorylocking", InventoryLocking),
        ("inventorylockinglayer", InventoryLocking),
        ("cache", Cache),
        ("redis", Cache),
        ("featurestore", FeatureStore),
        ("database", Database),
        ("messagestore", MessageStore),
        ("mediastore", MediaStore),
        ("searchindex", SearchIndex),
        ("queue", Queue),
        ("eventstream", EventStream),
        ("eventqueue", EventStream),
        ("worker", Worker),
        ("notificationservice", NotificationService),
        ("gateway", Gateway),
        ("chatserver", ChatServer),
        ("tokenbucket", TokenBucket),
        ("distributedsync", DistributedSync),
    ])
});

static ALL_CANONICAL: Lazy<Vec<ComponentType>> = Lazy::new(|| {
    use ComponentType::*;
    vec![
        User,
        Cdn,
        ApiGateway,
        LoadBalancer,
        Edge,
        RateLimiter,
        Gateway,
        Server,
        MatchingEngine,
        LocationService,
        TripService,
        TransactionService,
        MlInferenceService,
        RuleEngine,
        IdGenerator,
        InventoryService,
        PaymentGateway,
        InventoryLocking,
        ChatServer,
        Cache,
        FeatureStore,
        TokenBucket,
        Database,
        MessageStore,
        MediaStore,
        SearchIndex,
        Queue,
        EventStream,
        Worker,
        DistributedSync,
        NotificationService,
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_aliases() {
        assert_eq!(ComponentType::normalize("redis"), ComponentType::Cache);
        assert_eq!(
            ComponentType::normalize("Load Balancer"),
            ComponentType::LoadBalancer
        );
        assert_eq!(
            ComponentType::normalize("api-gateway"),
            ComponentType::ApiGateway
        );
        assert_eq!(
            ComponentType::normalize("event_queue"),
            ComponentType::EventStream
        );
    }

    #[test]
    fn empty_type_is_server() {
        assert_eq!(ComponentType::normalize(""), ComponentType::Server);
        assert_eq!(ComponentType::normalize("   "), ComponentType::Server);
    }

    #[test]
    fn unknown_type_falls_back_to_raw() {
        assert_eq!(
            ComponentType::normalize("QuantumOracle"),
            ComponentType::Other("QuantumOracle".to_string())
        );
    }

    #[test]
    fn canonical_name_round_trips_through_normalize() {
        for ty in ComponentType::all() {
            let name = ty.canonical_name();
            assert_eq!(ComponentType::normalize(name).canonical_name(), name);
        }
    }
}
