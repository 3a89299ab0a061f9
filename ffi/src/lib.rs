//! C-ABI wrapper around `ridebook-core`.
//!
//! # Overview
//! Exposes the places and booking request builders, response parsers, the
//! locale join and the helper mappings through `extern "C"` functions, so a
//! mobile shell can run the network I/O on its own HTTP stack without linking
//! to Rust's async runtime or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1. The
//!   autocomplete join takes both raw responses in one call.
//! - A single `FfiRideResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `ride_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use chrono::DateTime;
use ridebook_core::types::{BookingPayload, Customer, LocationRef, Trip, VehicleClass};
use ridebook_core::{merge_suggestions, LocaleSettings};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a `PlacesClient` for `base_url` authenticated with `api_key`.
///
/// Returns null if either argument is null or not UTF-8.
/// The caller must free the returned pointer with `ride_places_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn ride_places_client_new(
    base_url: *const c_char,
    api_key: *const c_char,
) -> *mut FfiPlacesClient {
    catch_unwind(|| {
        let (Some(base_url), Some(api_key)) =
            (unsafe { from_c_str(base_url) }, unsafe { from_c_str(api_key) })
        else {
            return std::ptr::null_mut();
        };
        let client = ridebook_core::PlacesClient::new(base_url, api_key);
        Box::into_raw(Box::new(FfiPlacesClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `ride_places_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ride_places_client_free(client: *mut FfiPlacesClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Create a `BookingClient` posting to `endpoint`.
///
/// The endpoint is validated when a request is built, so a malformed URL
/// surfaces as a null request rather than a null client.
#[unsafe(no_mangle)]
pub extern "C" fn ride_booking_client_new(endpoint: *const c_char) -> *mut FfiBookingClient {
    catch_unwind(|| {
        let Some(endpoint) = (unsafe { from_c_str(endpoint) }) else {
            return std::ptr::null_mut();
        };
        let client = ridebook_core::BookingClient::new(endpoint);
        Box::into_raw(Box::new(FfiBookingClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `ride_booking_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ride_booking_client_free(client: *mut FfiBookingClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

/// Build one autocomplete request.
///
/// `included_regions` is a comma-separated list of region codes and may be
/// null. Call twice, once with the user's language and once with `"en"`, and
/// pass both responses to `ride_merge_autocomplete`. Session tokens are not
/// attached on this path.
/// Returns null on a null argument or an invalid base URL.
#[unsafe(no_mangle)]
pub extern "C" fn ride_build_autocomplete(
    client: *const FfiPlacesClient,
    text: *const c_char,
    language_code: *const c_char,
    region_code: *const c_char,
    included_regions: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(text), Some(language_code), Some(region_code)) = (
            unsafe { from_c_str(text) },
            unsafe { from_c_str(language_code) },
            unsafe { from_c_str(region_code) },
        ) else {
            return std::ptr::null_mut();
        };
        let locale = LocaleSettings {
            language_code: language_code.to_string(),
            region_code: region_code.to_string(),
            included_regions: unsafe { from_c_str(included_regions) }
                .map(split_regions)
                .unwrap_or_default(),
        };
        match client.inner.build_autocomplete(&locale.localized_query(text, None)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

fn split_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the localized and English autocomplete responses and join them.
///
/// Returns a result with `data_tag = SuggestionList` on success. If either
/// response is a failure the whole call fails with that error.
#[unsafe(no_mangle)]
pub extern "C" fn ride_merge_autocomplete(
    client: *const FfiPlacesClient,
    localized: *const FfiHttpResponse,
    english: *const FfiHttpResponse,
) -> *mut FfiRideResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiRideResult::null_arg("client");
        }
        if localized.is_null() {
            return FfiRideResult::null_arg("localized");
        }
        if english.is_null() {
            return FfiRideResult::null_arg("english");
        }
        let client = unsafe { &*client };
        let localized = client.inner.parse_autocomplete(unsafe { &*localized }.to_core());
        let english = client.inner.parse_autocomplete(unsafe { &*english }.to_core());
        match localized.and_then(|l| english.map(|e| merge_suggestions(l, e))) {
            Ok(suggestions) => FfiRideResult::ok_suggestions(suggestions),
            Err(e) => FfiRideResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiRideResult::panic("panic in ride_merge_autocomplete"))
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Read an `FfiBookingPayload` into the core type. `None` if a required
/// string is null or not UTF-8.
fn payload_from_ffi(p: &FfiBookingPayload) -> Option<BookingPayload> {
    let read = |s: *const c_char| unsafe { from_c_str(s) }.map(str::to_string);

    Some(BookingPayload {
        customer: Customer {
            name: read(p.customer_name)?,
            email: read(p.customer_email)?,
            phone: read(p.customer_phone)?,
        },
        trip: Trip {
            pickup: LocationRef {
                description: read(p.pickup_description)?,
                place_id: read(p.pickup_place_id),
            },
            destination: LocationRef {
                description: read(p.destination_description)?,
                place_id: read(p.destination_place_id),
            },
            date_time: read(p.date_time)?,
            passengers: u32::try_from(p.passengers).ok(),
            flight_number: read(p.flight_number).filter(|f| !f.is_empty()),
            vehicle_class: p.vehicle_class.into(),
        },
    })
}

/// Build the trip-request POST.
///
/// Returns null on a null client or payload, a missing required field, or
/// an invalid endpoint.
#[unsafe(no_mangle)]
pub extern "C" fn ride_build_booking(
    client: *const FfiBookingClient,
    payload: *const FfiBookingPayload,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || payload.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(payload) = payload_from_ffi(unsafe { &*payload }) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_submit(&payload) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Classify a trip-request response.
///
/// Returns a result with `data_tag = BookingResult` on success. An `error`
/// field in the body yields `ServerRejected` even with HTTP 200.
#[unsafe(no_mangle)]
pub extern "C" fn ride_parse_booking(
    client: *const FfiBookingClient,
    response: *const FfiHttpResponse,
) -> *mut FfiRideResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiRideResult::null_arg("client");
        }
        if response.is_null() {
            return FfiRideResult::null_arg("response");
        }
        let client = unsafe { &*client };
        match client.inner.parse_submit(unsafe { &*response }.to_core()) {
            Ok(result) => FfiRideResult::ok_booking(result),
            Err(e) => FfiRideResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiRideResult::panic("panic in ride_parse_booking"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a vehicle model name to its bookable class. Null maps to `Business`.
#[unsafe(no_mangle)]
pub extern "C" fn ride_classify_vehicle(name: *const c_char) -> FfiVehicleClass {
    catch_unwind(|| {
        let name = unsafe { from_c_str(name) }.unwrap_or("");
        VehicleClass::classify(name).into()
    })
    .unwrap_or(FfiVehicleClass::Business)
}

/// Combine the date of `date` with the hour and minute of `time`.
///
/// Both arguments are RFC 3339 strings carrying the device's UTC offset.
/// Returns an RFC 3339 UTC string to free with `ride_free_string`, or null
/// if either argument is null or unparsable.
#[unsafe(no_mangle)]
pub extern "C" fn ride_combine_date_time(date: *const c_char, time: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let parse = |s: *const c_char| {
            unsafe { from_c_str(s) }.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        };
        match (parse(date), parse(time)) {
            (Some(date), Some(time)) => {
                to_c_string(ridebook_core::combine_date_and_time(&date, &time))
            }
            _ => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `ride_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ride_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    });
}

/// Free an `FfiRideResult` returned by any `ride_parse_*` / `ride_merge_*`
/// function. Safe to call with null. Uses `data_tag` to determine what
/// `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn ride_free_result(result: *mut FfiRideResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::SuggestionList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiSuggestionList) };
                if !list.items.is_null() && list.len > 0 {
                    let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
                    let items = unsafe { Box::from_raw(slice) };
                    for item in items.iter() {
                        unsafe { item.free_fields() };
                    }
                }
            }
            FfiDataTag::BookingResult => {
                let booking = unsafe { Box::from_raw(result.data as *mut FfiBookingResult) };
                unsafe { free_c_string(booking.message) };
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ride_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
