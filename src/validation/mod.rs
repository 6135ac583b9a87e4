pub mod leakage;

pub use leakage::{
    validate_no_leakage, FirstTimestampCheck, LeakageCheck, LeakageGuard, LeakageReport,
};
