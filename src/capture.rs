use crate::error::{IfwatchError, Result};
use std::io;
use std::mem;
use std::os::fd::RawFd;
use std::ptr;
use std::time::Duration;

/// Largest link-layer frame the receive buffer must hold.
pub const MAX_FRAME_SIZE: usize = 65536;

/// Network-layer protocol tag carried by the link-layer frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkProtocol {
    Ipv4,
    Ipv6,
    Other,
}

impl LinkProtocol {
    #[must_use]
    pub fn from_ethertype(ethertype: u16) -> Self {
        match libc::c_int::from(ethertype) {
            libc::ETH_P_IP => Self::Ipv4,
            libc::ETH_P_IPV6 => Self::Ipv6,
            _ => Self::Other,
        }
    }
}

/// Sender metadata delivered with every received frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameMeta {
    pub if_index: u32,
    pub protocol: LinkProtocol,
    pub ethertype: u16,
    pub hatype: u16,
}

/// Readiness result of one bounded wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wait {
    pub packet: bool,
    pub input: bool,
}

/// Raw link-layer socket receiving every frame on every interface.
///
/// # Permissions
///
/// Opening requires `CAP_NET_RAW`; `EPERM` surfaces as a socket error.
pub struct CaptureSocket {
    fd: RawFd,
}

impl CaptureSocket {
    pub fn open() -> Result<Self> {
        let protocol = libc::c_int::from((libc::ETH_P_ALL as u16).to_be());
        let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, protocol) };
        if fd < 0 {
            return Err(IfwatchError::Socket(io::Error::last_os_error()));
        }

        let socket = Self { fd };
        socket.set_nonblocking()?;
        Ok(socket)
    }

    fn set_nonblocking(&self) -> Result<()> {
        let fl = match unsafe { libc::fcntl(self.fd, libc::F_GETFL, 0) } {
            ..=-1 => return Err(IfwatchError::Socket(io::Error::last_os_error())),
            f => f,
        };

        match unsafe { libc::fcntl(self.fd, libc::F_SETFL, fl | libc::O_NONBLOCK) } {
            0 => Ok(()),
            _ => Err(IfwatchError::Socket(io::Error::last_os_error())),
        }
    }

    /// Non-blocking receive of one frame.
    ///
    /// Returns `None` when nothing is queued (or the call was interrupted);
    /// only genuine socket failures are errors.
    pub fn recv(&self, buf: &mut [u8]) -> Result<Option<(usize, FrameMeta)>> {
        let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        let mut addr_len = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;

        let received = unsafe {
            libc::recvfrom(
                self.fd,
                buf.as_mut_ptr().cast(),
                buf.len(),
                0,
                ptr::addr_of_mut!(addr).cast(),
                &mut addr_len,
            )
        };

        if received < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                _ => Err(IfwatchError::Socket(err)),
            };
        }

        let ethertype = u16::from_be(addr.sll_protocol);
        let meta = FrameMeta {
            if_index: addr.sll_ifindex as u32,
            protocol: LinkProtocol::from_ethertype(ethertype),
            ethertype,
            hatype: addr.sll_hatype,
        };

        Ok(Some((received as usize, meta)))
    }

    /// Bounded wait for "a frame is ready or a key was pressed".
    ///
    /// Wakes on whichever comes first, otherwise returns after `timeout`
    /// so timer-driven work is never starved.
    pub fn wait(&self, timeout: Duration) -> Result<Wait> {
        let mut fds = [
            libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            },
        ];

        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };

        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                // A signal landed; the loop picks up its flags next pass.
                return Ok(Wait::default());
            }
            return Err(IfwatchError::Socket(err));
        }

        Ok(Wait {
            packet: fds[0].revents & libc::POLLIN != 0,
            input: fds[1].revents & libc::POLLIN != 0,
        })
    }
}

impl Drop for CaptureSocket {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
