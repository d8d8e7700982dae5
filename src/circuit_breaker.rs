use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker guarding product store calls.
pub type StoreCircuitBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates the circuit breaker used in front of the product store.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive store failures open the circuit.
/// - **Backoff**: exponential, 10s up to 60s, before a trial call is let through.
///
/// While the circuit is open the catalog answers from the embedded dataset
/// without touching the database.
pub fn create_store_circuit_breaker() -> StoreCircuitBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(5, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}
