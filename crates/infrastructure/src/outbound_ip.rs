use std::net::{IpAddr, UdpSocket};

/// Discovers the server's primary outbound IPv4 by opening a UDP "connection"
/// to a public anycast address and reading back the local address — no
/// packet is actually sent (spec.md §4.3). Any failure here is fatal to
/// startup, since the DNS responder has no other source for the A record
/// it returns.
pub fn discover_outbound_ipv4(probe_addr: &str) -> anyhow::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(probe_addr)?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_some_local_address() {
        let ip = discover_outbound_ipv4("8.8.8.8:80").expect("outbound IP discovery");
        assert!(ip.is_ipv4());
    }
}
