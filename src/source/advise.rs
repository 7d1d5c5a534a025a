//! Page-cache advisories for file regions already read.

use std::fs::File;

/// Tells the kernel the first `len` bytes of `file` will not be read again.
///
/// Purely a hint: failures are traced and otherwise ignored.
#[cfg(target_os = "linux")]
#[allow(unsafe_code)]
pub(crate) fn drop_cached(file: &File, len: u64) {
    use std::os::unix::io::AsRawFd;

    let Ok(len) = libc::off_t::try_from(len) else {
        return;
    };

    // SAFETY: the descriptor is borrowed from a live `File` for the duration of
    // the call, and posix_fadvise neither reads nor writes process memory.
    let ret = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, len, libc::POSIX_FADV_DONTNEED) };
    if ret != 0 {
        tracing::trace!(errno = ret, len, "posix_fadvise failed");
    }
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn drop_cached(_file: &File, _len: u64) {}
