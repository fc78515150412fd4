//! WebDAV status codes.

/// HTTP/WebDAV status codes a file-access server commonly returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DavStatus {
    /// Request succeeded
    Ok = 200,
    /// Resource created (PUT, MKCOL, MOVE to a new name)
    Created = 201,
    /// Request succeeded without a body (DELETE, MOVE over existing)
    NoContent = 204,
    /// PROPFIND result document
    MultiStatus = 207,
    /// Malformed request
    BadRequest = 400,
    /// Authentication required
    Unauthorized = 401,
    /// Access denied
    Forbidden = 403,
    /// Resource does not exist
    NotFound = 404,
    /// Method not allowed on this resource (MKCOL on existing resource)
    MethodNotAllowed = 405,
    /// Intermediate collection missing
    Conflict = 409,
    /// Destination exists and overwrite was refused
    PreconditionFailed = 412,
    /// Upload too large
    PayloadTooLarge = 413,
    /// Resource is locked
    Locked = 423,
    /// Server error
    InternalServerError = 500,
    /// Server does not implement the method
    NotImplemented = 501,
    /// Destination lives on another server
    BadGateway = 502,
    /// Storage is full
    InsufficientStorage = 507,
    /// Any other code
    Unknown = 0,
}

impl From<u16> for DavStatus {
    fn from(code: u16) -> Self {
        match code {
            200 => DavStatus::Ok,
            201 => DavStatus::Created,
            204 => DavStatus::NoContent,
            207 => DavStatus::MultiStatus,
            400 => DavStatus::BadRequest,
            401 => DavStatus::Unauthorized,
            403 => DavStatus::Forbidden,
            404 => DavStatus::NotFound,
            405 => DavStatus::MethodNotAllowed,
            409 => DavStatus::Conflict,
            412 => DavStatus::PreconditionFailed,
            413 => DavStatus::PayloadTooLarge,
            423 => DavStatus::Locked,
            500 => DavStatus::InternalServerError,
            501 => DavStatus::NotImplemented,
            502 => DavStatus::BadGateway,
            507 => DavStatus::InsufficientStorage,
            _ => DavStatus::Unknown,
        }
    }
}

impl DavStatus {
    /// Get human-readable description of the status.
    pub fn description(&self) -> &'static str {
        match self {
            DavStatus::Ok => "OK",
            DavStatus::Created => "Created",
            DavStatus::NoContent => "No content",
            DavStatus::MultiStatus => "Multi-status",
            DavStatus::BadRequest => "Bad request",
            DavStatus::Unauthorized => "Unauthorized",
            DavStatus::Forbidden => "Access denied",
            DavStatus::NotFound => "Resource does not exist",
            DavStatus::MethodNotAllowed => "Method not allowed",
            DavStatus::Conflict => "Conflict",
            DavStatus::PreconditionFailed => "Destination already exists",
            DavStatus::PayloadTooLarge => "Payload too large",
            DavStatus::Locked => "Resource locked",
            DavStatus::InternalServerError => "Internal server error",
            DavStatus::NotImplemented => "Not implemented",
            DavStatus::BadGateway => "Bad destination",
            DavStatus::InsufficientStorage => "Insufficient storage",
            DavStatus::Unknown => "Unknown status",
        }
    }

    /// True for any 2xx code.
    pub fn is_success(code: u16) -> bool {
        (200..300).contains(&code)
    }
}
