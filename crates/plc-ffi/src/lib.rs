//! C FFI bindings for plc-core
//!
//! This crate provides a C-compatible API so a desktop or web shell can show
//! the input preview, the mapping report and the converted table without
//! reimplementing any of the conversion logic.

use plc_core::{CanonicalField, Conversion, ParseOptions, Table};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;

/// Opaque handle to a parsed input and its conversion
pub struct FfiConversion {
    source: Table,
    conversion: Conversion,
}

/// Interior NUL bytes become U+FFFD so a null return always means "no value"
fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "\u{fffd}"))
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

fn field_at(index: usize) -> Option<CanonicalField> {
    CanonicalField::ALL.get(index).copied()
}

/// Parse and convert a CSV file without writing any output
///
/// `delimiter` is the input field separator, usually `,`.
///
/// # Safety
/// - `path` must be a valid C string
/// - Returns null on error
#[no_mangle]
pub unsafe extern "C" fn plc_convert_path(path: *const c_char, delimiter: c_char) -> *mut FfiConversion {
    if path.is_null() {
        return ptr::null_mut();
    }

    let path = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    let options = ParseOptions::default().with_delimiter(delimiter as u8);
    match plc_core::convert_path(Path::new(path), &options) {
        Ok((source, conversion)) => Box::into_raw(Box::new(FfiConversion { source, conversion })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a conversion handle
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path` or null
#[no_mangle]
pub unsafe extern "C" fn plc_free_conversion(conversion: *mut FfiConversion) {
    if !conversion.is_null() {
        drop(Box::from_raw(conversion));
    }
}

/// Number of canonical output fields
#[no_mangle]
pub extern "C" fn plc_field_count() -> usize {
    CanonicalField::COUNT
}

/// Get a canonical field name by index
///
/// Returns null if index is out of bounds. Caller must free the returned
/// string with `plc_free_string`.
#[no_mangle]
pub extern "C" fn plc_field_name(index: usize) -> *mut c_char {
    field_at(index)
        .map(|f| to_c_string(f.name()))
        .unwrap_or(ptr::null_mut())
}

/// Get the input header that feeds a canonical field
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
/// - Returns null if the field is unmatched or out of bounds
/// - Caller must free the returned string with `plc_free_string`
#[no_mangle]
pub unsafe extern "C" fn plc_mapping_source(conversion: *const FfiConversion, field: usize) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    field_at(field)
        .and_then(|f| (*conversion).conversion.mapping.source_header(f))
        .map(to_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Get the row count of the converted table
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
#[no_mangle]
pub unsafe extern "C" fn plc_row_count(conversion: *const FfiConversion) -> usize {
    if conversion.is_null() {
        return 0;
    }
    (*conversion).conversion.output.row_count()
}

/// Get a converted cell value
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
/// - Returns null if row or field is out of bounds
/// - Caller must free the returned string with `plc_free_string`
#[no_mangle]
pub unsafe extern "C" fn plc_cell(conversion: *const FfiConversion, row: usize, field: usize) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    (&(*conversion)
        .conversion
        .output
        .rows)
        .get(row)
        .zip(field_at(field))
        .map(|(r, f)| to_c_string(r.get(f)))
        .unwrap_or(ptr::null_mut())
}

/// Get the column count of the input table
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
#[no_mangle]
pub unsafe extern "C" fn plc_input_column_count(conversion: *const FfiConversion) -> usize {
    if conversion.is_null() {
        return 0;
    }
    (*conversion).source.column_count()
}

/// Get an input column name by index
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `plc_free_string`
#[no_mangle]
pub unsafe extern "C" fn plc_input_column_name(conversion: *const FfiConversion, index: usize) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    (&(*conversion)
        .source
        .columns)
        .get(index)
        .map(|c| to_c_string(&c.name))
        .unwrap_or(ptr::null_mut())
}

/// Write the converted table as CSV
///
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `plc_convert_path`
/// - `path` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn plc_write_csv(conversion: *const FfiConversion, path: *const c_char) -> c_int {
    if conversion.is_null() || path.is_null() {
        return -1;
    }

    let path = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return -1,
    };

    match plc_core::save_csv(&(*conversion).conversion.output, Path::new(path)) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a plc_* function or null
#[no_mangle]
pub unsafe extern "C" fn plc_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    unsafe fn take_string(s: *mut c_char) -> Option<String> {
        if s.is_null() {
            return None;
        }
        let value = CStr::from_ptr(s).to_string_lossy().into_owned();
        plc_free_string(s);
        Some(value)
    }

    #[test]
    fn test_convert_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.csv");
        fs::write(&input, "Name,Owner,Notes\nMaple Court,Acme,x\n").unwrap();
        let c_path = CString::new(input.to_str().unwrap()).unwrap();

        unsafe {
            let handle = plc_convert_path(c_path.as_ptr(), b',' as c_char);
            assert!(!handle.is_null());

            assert_eq!(plc_field_count(), 7);
            assert_eq!(take_string(plc_field_name(4)).as_deref(), Some("zip_code"));
            assert!(plc_field_name(7).is_null());

            assert_eq!(take_string(plc_mapping_source(handle, 0)).as_deref(), Some("Name"));
            assert!(plc_mapping_source(handle, 5).is_null());

            assert_eq!(plc_row_count(handle), 1);
            assert_eq!(take_string(plc_cell(handle, 0, 6)).as_deref(), Some("Acme"));
            assert_eq!(take_string(plc_cell(handle, 0, 1)).as_deref(), Some(""));
            assert!(plc_cell(handle, 1, 0).is_null());

            assert_eq!(plc_input_column_count(handle), 3);
            assert_eq!(take_string(plc_input_column_name(handle, 2)).as_deref(), Some("Notes"));

            let out = CString::new(dir.path().join("out.csv").to_str().unwrap()).unwrap();
            assert_eq!(plc_write_csv(handle, out.as_ptr()), 0);
            assert!(dir.path().join("out.csv").exists());

            plc_free_conversion(handle);
        }
    }

    #[test]
    fn test_cell_with_nul_byte_is_not_null() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.csv");
        fs::write(&input, "Name\nMaple\0Court\n").unwrap();
        let c_path = CString::new(input.to_str().unwrap()).unwrap();

        unsafe {
            let handle = plc_convert_path(c_path.as_ptr(), b',' as c_char);
            assert!(!handle.is_null());
            assert_eq!(
                take_string(plc_cell(handle, 0, 0)).as_deref(),
                Some("Maple\u{fffd}Court")
            );
            plc_free_conversion(handle);
        }
    }

    #[test]
    fn test_null_handles() {
        unsafe {
            assert!(plc_convert_path(ptr::null(), b',' as c_char).is_null());
            assert_eq!(plc_row_count(ptr::null()), 0);
            assert!(plc_cell(ptr::null(), 0, 0).is_null());
            assert_eq!(plc_write_csv(ptr::null(), ptr::null()), -1);
            plc_free_conversion(ptr::null_mut());
        }
    }
}
