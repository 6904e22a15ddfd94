pub mod safe_math;
