use crate::runtime::cors::CorsRuleSet;
use crate::runtime::error::BackendError;

/// Replaces the complete CORS configuration of a bucket.
pub trait CorsPolicyApplier {
    fn apply(&self, bucket: &str, rule_set: &CorsRuleSet) -> Result<(), BackendError>;
}
