// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! Context entities. Each owns a disjoint `ai.*` tag prefix and serializes
//! to a flat map merged into the envelope tags.

use serde_json::{Map, Value};

use crate::data::bag::FieldBag;

/// Tags about the monitored application itself.
#[derive(Clone, Debug, Default)]
pub struct Application {
    bag: FieldBag,
}

impl Application {
    pub const VER: &'static str = "ai.application.ver";
    pub const NAME: &'static str = "ai.application.name";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn ver(&self) -> Option<&str> {
        self.bag.get_str(Self::VER)
    }

    pub fn set_ver(&mut self, ver: impl Into<String>) {
        self.bag.put(Self::VER, ver.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    /// Serialized tag view with absent values removed.
    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags about the client device the telemetry originates from.
#[derive(Clone, Debug, Default)]
pub struct Device {
    bag: FieldBag,
}

impl Device {
    pub const ID: &'static str = "ai.device.id";
    pub const LOCALE: &'static str = "ai.device.locale";
    pub const MODEL: &'static str = "ai.device.model";
    pub const OEM_NAME: &'static str = "ai.device.oemName";
    pub const TYPE: &'static str = "ai.device.type";
    pub const OS_VERSION: &'static str = "ai.device.osVersion";
    pub const NAME: &'static str = "ai.device.name";

    pub fn new() -> Self {
        Self::default()
    }

    /// Unique client device id. Computer name in most cases.
    pub fn id(&self) -> Option<&str> {
        self.bag.get_str(Self::ID)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put(Self::ID, id.into());
    }

    /// `<language>-<REGION>` per RFC 5646, e.g. `en-US`.
    pub fn locale(&self) -> Option<&str> {
        self.bag.get_str(Self::LOCALE)
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.bag.put(Self::LOCALE, locale.into());
    }

    pub fn model(&self) -> Option<&str> {
        self.bag.get_str(Self::MODEL)
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.bag.put(Self::MODEL, model.into());
    }

    pub fn oem_name(&self) -> Option<&str> {
        self.bag.get_str(Self::OEM_NAME)
    }

    pub fn set_oem_name(&mut self, oem_name: impl Into<String>) {
        self.bag.put(Self::OEM_NAME, oem_name.into());
    }

    /// Distinguishes client kinds, e.g. `PC`, `Phone`, `Browser`.
    pub fn device_type(&self) -> Option<&str> {
        self.bag.get_str(Self::TYPE)
    }

    pub fn set_device_type(&mut self, device_type: impl Into<String>) {
        self.bag.put(Self::TYPE, device_type.into());
    }

    pub fn os_version(&self) -> Option<&str> {
        self.bag.get_str(Self::OS_VERSION)
    }

    pub fn set_os_version(&mut self, os_version: impl Into<String>) {
        self.bag.put(Self::OS_VERSION, os_version.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags about the cloud placement of the application.
#[derive(Clone, Debug, Default)]
pub struct Cloud {
    bag: FieldBag,
}

impl Cloud {
    pub const ROLE: &'static str = "ai.cloud.role";
    pub const ROLE_INSTANCE: &'static str = "ai.cloud.roleInstance";
    pub const NAME: &'static str = "ai.cloud.name";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<&str> {
        self.bag.get_str(Self::ROLE)
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.bag.put(Self::ROLE, role.into());
    }

    pub fn role_instance(&self) -> Option<&str> {
        self.bag.get_str(Self::ROLE_INSTANCE)
    }

    pub fn set_role_instance(&mut self, role_instance: impl Into<String>) {
        self.bag.put(Self::ROLE_INSTANCE, role_instance.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags about the end user the telemetry is about.
#[derive(Clone, Debug, Default)]
pub struct User {
    bag: FieldBag,
}

impl User {
    pub const ID: &'static str = "ai.user.id";
    pub const ACCOUNT_ID: &'static str = "ai.user.accountId";
    pub const AUTH_USER_ID: &'static str = "ai.user.authUserId";
    pub const NAME: &'static str = "ai.user.name";

    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymous user id.
    pub fn id(&self) -> Option<&str> {
        self.bag.get_str(Self::ID)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put(Self::ID, id.into());
    }

    /// Account the user acts within for multi-tenant applications.
    pub fn account_id(&self) -> Option<&str> {
        self.bag.get_str(Self::ACCOUNT_ID)
    }

    pub fn set_account_id(&mut self, account_id: impl Into<String>) {
        self.bag.put(Self::ACCOUNT_ID, account_id.into());
    }

    /// Authenticated user id. PII, so not collected by default.
    pub fn auth_user_id(&self) -> Option<&str> {
        self.bag.get_str(Self::AUTH_USER_ID)
    }

    pub fn set_auth_user_id(&mut self, auth_user_id: impl Into<String>) {
        self.bag.put(Self::AUTH_USER_ID, auth_user_id.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags about where the telemetry was sent from.
#[derive(Clone, Debug, Default)]
pub struct Location {
    bag: FieldBag,
}

impl Location {
    pub const IP: &'static str = "ai.location.ip";
    pub const NAME: &'static str = "ai.location.name";

    pub fn new() -> Self {
        Self::default()
    }

    /// IP address of the client device. IPv4 and IPv6 are accepted.
    pub fn ip(&self) -> Option<&str> {
        self.bag.get_str(Self::IP)
    }

    pub fn set_ip(&mut self, ip: impl Into<String>) {
        self.bag.put(Self::IP, ip.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags correlating telemetry items belonging to one operation.
#[derive(Clone, Debug, Default)]
pub struct Operation {
    bag: FieldBag,
}

impl Operation {
    pub const ID: &'static str = "ai.operation.id";
    pub const PARENT_ID: &'static str = "ai.operation.parentId";
    pub const SYNTHETIC_SOURCE: &'static str = "ai.operation.syntheticSource";
    pub const CORRELATION_VECTOR: &'static str = "ai.operation.correlationVector";
    pub const NAME: &'static str = "ai.operation.name";

    pub fn new() -> Self {
        Self::default()
    }

    /// Groups every telemetry item emitted for one operation instance.
    pub fn id(&self) -> Option<&str> {
        self.bag.get_str(Self::ID)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put(Self::ID, id.into());
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.bag.get_str(Self::PARENT_ID)
    }

    pub fn set_parent_id(&mut self, parent_id: impl Into<String>) {
        self.bag.put(Self::PARENT_ID, parent_id.into());
    }

    /// Marks traffic from crawlers, availability tests and the like.
    pub fn synthetic_source(&self) -> Option<&str> {
        self.bag.get_str(Self::SYNTHETIC_SOURCE)
    }

    pub fn set_synthetic_source(&mut self, synthetic_source: impl Into<String>) {
        self.bag.put(Self::SYNTHETIC_SOURCE, synthetic_source.into());
    }

    /// Lightweight vector clock ordering related events across services.
    pub fn correlation_vector(&self) -> Option<&str> {
        self.bag.get_str(Self::CORRELATION_VECTOR)
    }

    pub fn set_correlation_vector(&mut self, correlation_vector: impl Into<String>) {
        self.bag.put(Self::CORRELATION_VECTOR, correlation_vector.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// Tags about the user's interaction session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    bag: FieldBag,
}

impl Session {
    pub const ID: &'static str = "ai.session.id";
    pub const IS_FIRST: &'static str = "ai.session.isFirst";
    pub const NAME: &'static str = "ai.session.name";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.bag.get_str(Self::ID)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put(Self::ID, id.into());
    }

    pub fn is_first(&self) -> Option<bool> {
        match self.bag.get_str(Self::IS_FIRST) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    /// The ingestion schema expects this flag as the literal string
    /// `"true"` or `"false"`, not a JSON boolean.
    pub fn set_is_first(&mut self, is_first: bool) {
        let literal = if is_first { "true" } else { "false" };
        self.bag.put(Self::IS_FIRST, literal);
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}

/// SDK-internal tags, used for troubleshooting and billing.
#[derive(Clone, Debug, Default)]
pub struct Internal {
    bag: FieldBag,
}

impl Internal {
    pub const SDK_VERSION: &'static str = "ai.internal.sdkVersion";
    pub const AGENT_VERSION: &'static str = "ai.internal.agentVersion";
    pub const NODE_NAME: &'static str = "ai.internal.nodeName";
    pub const NAME: &'static str = "ai.internal.name";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn sdk_version(&self) -> Option<&str> {
        self.bag.get_str(Self::SDK_VERSION)
    }

    pub fn set_sdk_version(&mut self, sdk_version: impl Into<String>) {
        self.bag.put(Self::SDK_VERSION, sdk_version.into());
    }

    pub fn agent_version(&self) -> Option<&str> {
        self.bag.get_str(Self::AGENT_VERSION)
    }

    pub fn set_agent_version(&mut self, agent_version: impl Into<String>) {
        self.bag.put(Self::AGENT_VERSION, agent_version.into());
    }

    /// Node name used for billing; overrides the standard node detection.
    pub fn node_name(&self) -> Option<&str> {
        self.bag.get_str(Self::NODE_NAME)
    }

    pub fn set_node_name(&mut self, node_name: impl Into<String>) {
        self.bag.put(Self::NODE_NAME, node_name.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str(Self::NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put(Self::NAME, name.into());
    }

    pub fn to_tags(&self) -> Map<String, Value> {
        self.bag.to_pruned()
    }
}
