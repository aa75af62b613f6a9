use crate::{
    error::{IfwatchError, Result},
    platform::{PromiscControl, SystemTable},
};
use std::ffi::{CStr, CString};
use std::fs;
use std::os::fd::RawFd;

/// Shared scratch socket for the interface ioctls. Both the table and
/// the promiscuous control need one; neither sends traffic on it.
fn ioctl_socket() -> Result<RawFd> {
    match unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) } {
        fd if fd >= 0 => Ok(fd),
        _ => Err(IfwatchError::Platform(format!(
            "ioctl socket: {}",
            std::io::Error::last_os_error()
        ))),
    }
}

fn ifreq_for(name: &str) -> Option<libc::ifreq> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() >= libc::IFNAMSIZ {
        return None;
    }
    let mut req: libc::ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in req.ifr_name.iter_mut().zip(bytes) {
        *dst = *src as libc::c_char;
    }
    Some(req)
}

fn read_flags(fd: RawFd, name: &str) -> Option<libc::c_short> {
    let mut req = ifreq_for(name)?;
    match unsafe { libc::ioctl(fd, libc::SIOCGIFFLAGS, std::ptr::addr_of_mut!(req)) } {
        0 => Some(unsafe { req.ifr_ifru.ifru_flags }),
        _ => None,
    }
}

pub struct LinuxTable {
    fd: RawFd,
}

impl LinuxTable {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fd: ioctl_socket()?,
        })
    }

    /// Pulls interface names out of /proc/net/dev in table order.
    /// No filtering here; the registry applies dedup and up-state checks.
    fn parse_interface_names(content: &str) -> Vec<String> {
        let mut names = Vec::new();

        for line in content.lines().skip(2) {
            if let Some(name_part) = line.split(':').next() {
                let name = name_part.trim().to_string();
                if !name.is_empty() {
                    names.push(name);
                }
            }
        }

        names
    }
}

impl SystemTable for LinuxTable {
    fn interface_names(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string("/proc/net/dev")?;
        Ok(Self::parse_interface_names(&content))
    }

    fn is_up(&self, name: &str) -> bool {
        read_flags(self.fd, name)
            .map(|flags| libc::c_int::from(flags) & libc::IFF_UP != 0)
            .unwrap_or(false)
    }

    fn index_of(&self, name: &str) -> Option<u32> {
        let cname = CString::new(name).ok()?;
        match unsafe { libc::if_nametoindex(cname.as_ptr()) } {
            0 => None,
            index => Some(index),
        }
    }

    fn name_of(&self, index: u32) -> Option<String> {
        let mut buf = [0 as libc::c_char; libc::IF_NAMESIZE];
        let ptr = unsafe { libc::if_indextoname(index, buf.as_mut_ptr()) };
        if ptr.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        Some(name.to_string_lossy().into_owned())
    }
}

impl Drop for LinuxTable {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}

pub struct LinuxPromisc {
    fd: RawFd,
}

impl LinuxPromisc {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fd: ioctl_socket()?,
        })
    }
}

impl PromiscControl for LinuxPromisc {
    fn get(&self, name: &str) -> Result<bool> {
        let flags = read_flags(self.fd, name).ok_or_else(|| {
            IfwatchError::Platform(format!("SIOCGIFFLAGS failed for {name}"))
        })?;
        Ok(libc::c_int::from(flags) & libc::IFF_PROMISC != 0)
    }

    fn set(&mut self, name: &str, on: bool) -> Result<()> {
        let flags = read_flags(self.fd, name).ok_or_else(|| {
            IfwatchError::Platform(format!("SIOCGIFFLAGS failed for {name}"))
        })?;

        let mut new_flags = libc::c_int::from(flags);
        if on {
            new_flags |= libc::IFF_PROMISC;
        } else {
            new_flags &= !libc::IFF_PROMISC;
        }

        let mut req = ifreq_for(name)
            .ok_or_else(|| IfwatchError::Platform(format!("bad interface name {name}")))?;
        req.ifr_ifru.ifru_flags = new_flags as libc::c_short;

        match unsafe { libc::ioctl(self.fd, libc::SIOCSIFFLAGS, std::ptr::addr_of_mut!(req)) } {
            0 => Ok(()),
            _ => Err(IfwatchError::Platform(format!(
                "SIOCSIFFLAGS failed for {name}: {}",
                std::io::Error::last_os_error()
            ))),
        }
    }
}

impl Drop for LinuxPromisc {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
