pub mod campus;
