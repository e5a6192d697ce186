/// Prefix of every connectionless datagram in the Quake 3 protocol family.
pub const OOB_HEADER: [u8; 4] = [0xFF; 4];

const RCON_PREFIX: &[u8] = b"rcon ";

/// Builds `FF FF FF FF rcon <password> <command>\n`.
///
/// Neither argument is escaped: the wire format has no quoting, so embedded
/// spaces or newlines reach the server as-is.
pub fn build_frame(password: &str, command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(
        OOB_HEADER.len() + RCON_PREFIX.len() + password.len() + command.len() + 2,
    );
    frame.extend_from_slice(&OOB_HEADER);
    frame.extend_from_slice(RCON_PREFIX);
    frame.extend_from_slice(password.as_bytes());
    frame.push(b' ');
    frame.extend_from_slice(command.as_bytes());
    frame.push(b'\n');
    frame
}

#[inline]
pub fn find_header(data: &[u8]) -> Option<usize> {
    data.windows(OOB_HEADER.len())
        .position(|window| window == OOB_HEADER)
}
