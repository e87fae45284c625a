// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use uuid::Uuid;

use crate::data::{
    Application, Cloud, Device, Internal, Location, Operation, Properties, Session, User,
};
use crate::session::{CurrentSession, CurrentUser};

/// Ambient state stamped onto every outgoing envelope.
///
/// Owns the instrumentation key, one instance of each context entity, and
/// a map of custom properties merged into every item that has room for
/// them.
#[derive(Clone, Debug)]
pub struct TelemetryContext {
    instrumentation_key: String,
    application: Application,
    device: Device,
    cloud: Cloud,
    user: User,
    location: Location,
    operation: Operation,
    session: Session,
    internal: Internal,
    properties: Properties,
}

/// Deliberately loose: anything with at least four period-separated
/// segments passes.
fn looks_like_ipv4(value: &str) -> bool {
    value.split('.').count() >= 4
}

impl TelemetryContext {
    /// A context with a fresh anonymous user, no session, and no client IP.
    pub fn new(instrumentation_key: impl Into<String>) -> Self {
        Self::from_environment(
            instrumentation_key,
            &CurrentUser::default(),
            &CurrentSession::default(),
            None,
        )
    }

    /// Builds the context from resolved identity values.
    ///
    /// Seeds the user and session ids, mints a fresh operation id, records
    /// the client IP when it has an IPv4 shape, and stamps the SDK version
    /// tag.
    pub fn from_environment(
        instrumentation_key: impl Into<String>,
        user: &CurrentUser,
        session: &CurrentSession,
        client_ip: Option<&str>,
    ) -> Self {
        let mut context = Self {
            instrumentation_key: instrumentation_key.into(),
            application: Application::new(),
            device: Device::new(),
            cloud: Cloud::new(),
            user: User::new(),
            location: Location::new(),
            operation: Operation::new(),
            session: Session::new(),
            internal: Internal::new(),
            properties: Properties::new(),
        };

        context.user.set_id(user.id());
        if let Some(id) = session.id() {
            context.session.set_id(id);
        }
        context.operation.set_id(Uuid::new_v4().to_string());
        if let Some(ip) = client_ip {
            if looks_like_ipv4(ip) {
                context.location.set_ip(ip);
            }
        }
        context.internal.set_sdk_version(crate::SDK_VERSION);

        context
    }

    pub fn instrumentation_key(&self) -> &str {
        &self.instrumentation_key
    }

    pub fn set_instrumentation_key(&mut self, instrumentation_key: impl Into<String>) {
        self.instrumentation_key = instrumentation_key.into();
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn application_mut(&mut self) -> &mut Application {
        &mut self.application
    }

    pub fn set_application(&mut self, application: Application) {
        self.application = application;
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    pub fn cloud_mut(&mut self) -> &mut Cloud {
        &mut self.cloud
    }

    pub fn set_cloud(&mut self, cloud: Cloud) {
        self.cloud = cloud;
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    pub fn set_user(&mut self, user: User) {
        self.user = user;
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn operation_mut(&mut self) -> &mut Operation {
        &mut self.operation
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn internal(&self) -> &Internal {
        &self.internal
    }

    pub fn internal_mut(&mut self) -> &mut Internal {
        &mut self.internal
    }

    /// Custom properties merged into every outgoing item. An item's own
    /// properties win on key conflicts.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }
}
