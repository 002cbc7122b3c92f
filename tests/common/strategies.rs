use proptest::prelude::*;

/// Strategy for provisioned vCPU counts
pub fn vcpu_count_strategy() -> impl Strategy<Value = u32> {
    1u32..=1024
}

/// Strategy for thresholds in (0, 1]
pub fn threshold_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), (1u32..=1000).prop_map(|n| f64::from(n) / 1000.0)]
}

/// Strategy for active session counts
pub fn active_sessions_strategy() -> impl Strategy<Value = i64> {
    0i64..=4096
}
