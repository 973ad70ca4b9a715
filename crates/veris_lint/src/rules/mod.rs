//! All built-in lint rule implementations.
//!
//! One module per rule, named by its diagnostic code. `register_builtin_rules`
//! adds all rules to a `LintEngine` in their fixed registration order.

mod e101;
mod e102;
mod e103;
mod w001;
mod w002;
mod w003;
mod w004;

pub use e101::UndrivenSignal;
pub use e102::MultiDrivenSignal;
pub use e103::UndefinedSignal;
pub use w001::BlockingInSequential;
pub use w002::NonBlockingInCombinational;
pub use w003::MissingDefaultCase;
pub use w004::IncompleteSensitivity;

use crate::LintEngine;

/// Registers all built-in lint rules with the engine.
///
/// Registration order is fixed; it determines diagnostic emission order.
pub fn register_builtin_rules(engine: &mut LintEngine) {
    engine.register(Box::new(UndrivenSignal));
    engine.register(Box::new(MultiDrivenSignal));
    engine.register(Box::new(UndefinedSignal));
    engine.register(Box::new(BlockingInSequential));
    engine.register(Box::new(NonBlockingInCombinational));
    engine.register(Box::new(MissingDefaultCase));
    engine.register(Box::new(IncompleteSensitivity));
}
