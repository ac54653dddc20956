//! Derived computations atop the evaluator and history: deltas against
//! the last recorded run, ratchet enforcement, trend lines, debt
//! estimates, threshold suggestions, and profile-to-profile comparison.
//! All of them consume a finished [`Report`](crate::model::Report) (and
//! a [`History`](crate::model::History) where applicable) and never
//! re-aggregate.

pub mod compare;
pub mod debt;
pub mod delta;
pub mod ratchet;
pub mod suggest;
pub mod trend;
