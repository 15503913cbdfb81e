//! HMRC fraud prevention headers.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → device.rs (read or issue the Gov-Client-Device-ID cookie)
//!     → telemetry.rs (typed browser telemetry)
//!     → ip.rs (client public IP, IP percent-encoding)
//!     → vendor.rs (vendor identity, hashed installation GUID)
//!     → builder.rs (assemble)
//!     → headers.rs (ordered map handed to the HMRC client)
//! ```

pub mod builder;
pub mod device;
pub mod error;
pub mod headers;
pub mod ip;
pub mod names;
pub mod telemetry;
pub mod vendor;

pub use builder::{HeaderBuilder, RequestContext};
pub use device::{resolve_device_id, DeviceId};
pub use error::{FraudHeaderError, FraudHeaderResult};
pub use headers::FraudHeaders;
pub use ip::{encode_ip, encode_optional_ip, resolve_client_ip};
pub use telemetry::ClientTelemetry;
pub use vendor::{Platform, VendorInfo};
