use crate::error::Result;

/// A datagram transport carrying Netlink payloads.
///
/// [`NetlinkSocket`](crate::NetlinkSocket) is the production
/// implementation; tests substitute scripted fakes. One call maps to one
/// datagram — there is no partial send or receive.
pub trait Transport {
    /// Frame one payload and transmit it.
    fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Receive one datagram and return its unframed payload.
    fn recv(&mut self) -> Result<Vec<u8>>;
}
