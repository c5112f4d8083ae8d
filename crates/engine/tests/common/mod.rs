#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;

use studioflow_core::package::PackageType;
use studioflow_core::phase::Phase;
use studioflow_core::project::{CreateProject, Customer, Project};
use studioflow_db::repositories::ProjectRepo;
use studioflow_db::MemoryStore;
use studioflow_engine::{Engine, EngineConfig};
use studioflow_events::testing::{RecordingEmailTransport, RecordingPushTransport};

pub const CUSTOMER_EMAIL: &str = "jane@example.com";
pub const DEVELOPER_EMAIL: &str = "dev@studio.example";

pub struct TestEngine {
    pub engine: Engine,
    pub email: Arc<RecordingEmailTransport>,
    pub push: Arc<RecordingPushTransport>,
}

pub fn test_engine() -> TestEngine {
    with_email(Arc::new(RecordingEmailTransport::new()))
}

pub fn with_email(email: Arc<RecordingEmailTransport>) -> TestEngine {
    let push = Arc::new(RecordingPushTransport::new());
    let engine = Engine::new(
        Arc::new(MemoryStore::new()),
        email.clone(),
        push.clone(),
        EngineConfig {
            developer_email: Some(DEVELOPER_EMAIL.to_string()),
            default_revisions_total: 5,
        },
    );
    TestEngine {
        engine,
        email,
        push,
    }
}

pub fn create_input() -> CreateProject {
    CreateProject {
        service_type: "website".to_string(),
        package_type: PackageType::Professional,
        customer: Customer {
            name: "Jane Doe".to_string(),
            email: CUSTOMER_EMAIL.to_string(),
            phone: None,
            company_name: None,
        },
        revisions_total: None,
    }
}

/// Create a project, then force its phase and revision usage. The record is
/// back-dated an hour so later writes have a strictly newer `updated_at`.
pub async fn seed_project(engine: &Engine, phase: Phase, used: u32, total: u32) -> Project {
    let mut project = engine.projects.create(create_input()).await.unwrap();
    project.created_at = project.created_at - Duration::hours(1);
    project.updated_at = project.created_at;
    project.phase = phase;
    project.revisions_used = used;
    project.revisions_total = total;
    ProjectRepo::update(engine.store.as_ref(), &project).await.unwrap();
    project
}
