//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use ridebook_core::error::ApiError;
use ridebook_core::http::HttpMethod;
use ridebook_core::types::{BookingResult, Suggestion, VehicleClass};

/// Opaque handle to a `PlacesClient`.
pub struct FfiPlacesClient {
    pub(crate) inner: ridebook_core::PlacesClient,
}

/// Opaque handle to a `BookingClient`.
pub struct FfiBookingClient {
    pub(crate) inner: ridebook_core::BookingClient,
}

/// Allocate a C string. Interior NULs are dropped rather than failing.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
pub(crate) unsafe fn from_c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Free a C string allocated by `to_c_string`. Null is a no-op.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Post = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `ride_build_*` functions. The C caller executes the request with
/// `timeout_ms` as the overall deadline (0 means none) and passes the
/// response back through `ride_parse_*` / `ride_merge_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: ridebook_core::HttpRequest) -> *mut Self {
        let url = to_c_string(req.url);
        let body = match req.body {
            Some(b) => to_c_string(b),
            None => std::ptr::null_mut(),
        };
        let timeout_ms = req.timeout.map(|t| t.as_millis() as u64).unwrap_or(0);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            timeout_ms,
        }))
    }
}

// ---------------------------------------------------------------------------
// Caller-provided inputs (read, never freed by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `ride_parse_*` / `ride_merge_*` function.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> ridebook_core::HttpResponse {
        ridebook_core::HttpResponse {
            status: self.status,
            headers: Vec::new(),
            body: unsafe { from_c_str(self.body) }.unwrap_or("").to_string(),
        }
    }
}

/// Vehicle class as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiVehicleClass {
    Business = 0,
    First = 1,
    Xl = 2,
}

impl From<VehicleClass> for FfiVehicleClass {
    fn from(v: VehicleClass) -> Self {
        match v {
            VehicleClass::Business => FfiVehicleClass::Business,
            VehicleClass::First => FfiVehicleClass::First,
            VehicleClass::Xl => FfiVehicleClass::Xl,
        }
    }
}

impl From<FfiVehicleClass> for VehicleClass {
    fn from(v: FfiVehicleClass) -> Self {
        match v {
            FfiVehicleClass::Business => VehicleClass::Business,
            FfiVehicleClass::First => VehicleClass::First,
            FfiVehicleClass::Xl => VehicleClass::Xl,
        }
    }
}

/// Booking form as filled in by the app.
///
/// `pickup_place_id`, `destination_place_id` and `flight_number` may be null.
/// `passengers` below zero means "not given".
#[repr(C)]
pub struct FfiBookingPayload {
    pub customer_name: *const c_char,
    pub customer_email: *const c_char,
    pub customer_phone: *const c_char,
    pub pickup_description: *const c_char,
    pub pickup_place_id: *const c_char,
    pub destination_description: *const c_char,
    pub destination_place_id: *const c_char,
    pub date_time: *const c_char,
    pub passengers: i32,
    pub flight_number: *const c_char,
    pub vehicle_class: FfiVehicleClass,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiRideResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidEndpoint = 1,
    Encoding = 2,
    ServerRejected = 3,
    Transport = 4,
    MalformedResponse = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `ride_free_result` what `FfiRideResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    SuggestionList = 1,
    BookingResult = 2,
}

/// One merged suggestion exposed to C.
#[repr(C)]
pub struct FfiSuggestion {
    pub place_id: *mut c_char,
    pub main_text: *mut c_char,
    pub secondary_text: *mut c_char,
    pub main_text_localized: *mut c_char,
    pub secondary_text_localized: *mut c_char,
}

impl FfiSuggestion {
    fn from_core(s: Suggestion) -> Self {
        Self {
            place_id: to_c_string(s.place_id),
            main_text: to_c_string(s.main_text),
            secondary_text: to_c_string(s.secondary_text),
            main_text_localized: to_c_string(s.main_text_localized),
            secondary_text_localized: to_c_string(s.secondary_text_localized),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.place_id);
            free_c_string(self.main_text);
            free_c_string(self.secondary_text);
            free_c_string(self.main_text_localized);
            free_c_string(self.secondary_text_localized);
        }
    }
}

/// A list of suggestions exposed to C.
#[repr(C)]
pub struct FfiSuggestionList {
    pub items: *mut FfiSuggestion,
    pub len: u32,
}

/// Decoded booking envelope. `has_success` / `has_request_id` flag the
/// optional scalars; `message` may be null.
#[repr(C)]
pub struct FfiBookingResult {
    pub has_success: bool,
    pub success: bool,
    pub has_request_id: bool,
    pub request_id: i64,
    pub message: *mut c_char,
}

/// Result envelope for all parse and merge operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_code`
/// describes the category, `error_message` is a human-readable C string,
/// `http_status` carries the status of a server rejection, and `data` is null.
#[repr(C)]
pub struct FfiRideResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiRideResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiRideResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a `FfiSuggestionList`.
    pub(crate) fn ok_suggestions(suggestions: Vec<Suggestion>) -> *mut Self {
        let len = suggestions.len() as u32;
        let items = if suggestions.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_items: Box<[FfiSuggestion]> =
                suggestions.into_iter().map(FfiSuggestion::from_core).collect();
            Box::into_raw(ffi_items) as *mut FfiSuggestion
        };
        let list = Box::new(FfiSuggestionList { items, len });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::SuggestionList,
            Box::into_raw(list) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result carrying a `FfiBookingResult`.
    pub(crate) fn ok_booking(result: BookingResult) -> *mut Self {
        let ffi = Box::new(FfiBookingResult {
            has_success: result.success.is_some(),
            success: result.success.unwrap_or(false),
            has_request_id: result.request_id.is_some(),
            request_id: result.request_id.unwrap_or(0),
            message: result.message.map(to_c_string).unwrap_or(std::ptr::null_mut()),
        });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::BookingResult,
            Box::into_raw(ffi) as *mut std::ffi::c_void,
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::InvalidEndpoint(_) => (FfiErrorCode::InvalidEndpoint, 0),
            ApiError::Encoding(_) => (FfiErrorCode::Encoding, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::ServerRejected { status, .. } => (FfiErrorCode::ServerRejected, *status),
            ApiError::MalformedResponse(_) => (FfiErrorCode::MalformedResponse, 0),
        };
        // Rejections hand the server's own text to the UI.
        let message = match err {
            ApiError::ServerRejected { message, .. } => message,
            other => other.to_string(),
        };
        Self::boxed(
            error_code,
            to_c_string(message),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            to_c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            to_c_string(msg.to_string()),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
