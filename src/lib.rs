pub mod configuration;
pub mod domain;
pub mod local_recorder;
pub mod routes;
pub mod startup;
pub mod submission_router;
pub mod telemetry;
pub mod webhook_client;
