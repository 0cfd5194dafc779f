pub mod account_models;
pub mod issue_models;
pub mod machine_models;
