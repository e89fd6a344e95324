/*! Integration tests for Attrium.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - container: Tests for the Container document and Value types
 * - key_value: Tests for Keys and the mutable/immutable value objects
 * - manipulator: Tests for descriptor-driven bundles and their bulk operations
 * - cache: Tests for the immutable canonicalization cache
 * - transaction: Tests for DataTransactionResult and its builder
 * - registry: Tests for processor registration and ordered dispatch
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("attrium=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod cache;
mod key_value;
mod manipulator;
mod registry;
