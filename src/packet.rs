// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Cisco Systems, Inc. and its affiliates
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wire-format IPv4/TCP packet assembly.
//!
//! Two framings share one header layout:
//!
//! - [`build_tcp`] puts the fuzzed options into the TCP header's option
//!   area (IHL stays 5, the TCP data offset grows)
//! - [`build_ip`] puts them into the IPv4 header's option area (IHL
//!   grows, the TCP header starts after the options with data offset 5)
//!
//! Header randomness (IP id, source port, sequence number) comes from the
//! caller's PRNG, three draws per packet, so assembled bytes are as
//! reproducible as the option blobs.
//!
//! The IPv4 header checksum deliberately covers only the 20 fixed header
//! bytes, options excluded, and is stored as a native-endian field write;
//! the TCP checksum is computed over the pseudo-header and stored
//! big-endian. Both choices are part of the emitted-bytes contract and
//! pinned by tests.

use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::rng::XorShift64;

/// Fixed IPv4 header length in bytes.
pub const IP_HDR_LEN: usize = 20;

/// TCP header length without options, in bytes.
pub const TCP_HDR_LEN: usize = 20;

/// Send buffer size covering both framings at the maximum option length.
pub const SEND_BUF_LEN: usize = 256;

/// TCP SYN flag bit.
const TCP_FLAG_SYN: u8 = 0x02;

/// Fixed advertised receive window.
const TCP_WINDOW: u16 = 5840;

/// 16-bit ones'-complement checksum over `bytes`.
///
/// Consecutive byte pairs are summed as big-endian words; an odd trailing
/// byte is added to the low half. Carries are folded twice and the
/// complement returned.
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    for pair in bytes.chunks_exact(2) {
        sum += u32::from(u16::from_be_bytes([pair[0], pair[1]]));
    }
    if bytes.len() % 2 == 1 {
        sum += u32::from(bytes[bytes.len() - 1]);
    }

    sum = (sum >> 16) + (sum & 0xffff);
    sum += sum >> 16;

    !(sum as u16)
}

/// Build a TCP SYN segment carrying `opts` in the TCP option area.
///
/// Returns the total packet length written into `out`. `opts` must
/// already be padded to a 32-bit boundary.
pub fn build_tcp(
    out: &mut [u8],
    opts: &[u8],
    src: Ipv4Addr,
    dst: Ipv4Addr,
    dst_port: u16,
    prng: &mut XorShift64,
) -> Result<usize> {
    check_options(opts)?;
    let total_len = IP_HDR_LEN + TCP_HDR_LEN + opts.len();
    check_capacity(out, total_len)?;

    write_ip_header(out, 0, total_len as u16, src, dst, prng);
    write_tcp_header(out, IP_HDR_LEN, TCP_HDR_LEN + opts.len(), dst_port, prng);
    out[total_len - opts.len()..total_len].copy_from_slice(opts);

    write_tcp_checksum(out, IP_HDR_LEN, total_len, src, dst);

    Ok(total_len)
}

/// Build an IPv4 datagram carrying `opts` in the IPv4 option area, with a
/// bare TCP SYN header behind them.
///
/// Returns the total packet length written into `out`. `opts` must
/// already be padded to a 32-bit boundary.
pub fn build_ip(
    out: &mut [u8],
    opts: &[u8],
    src: Ipv4Addr,
    dst: Ipv4Addr,
    dst_port: u16,
    prng: &mut XorShift64,
) -> Result<usize> {
    check_options(opts)?;
    let ip_hdr_total = IP_HDR_LEN + opts.len();
    let total_len = ip_hdr_total + TCP_HDR_LEN;
    check_capacity(out, total_len)?;

    write_ip_header(out, opts.len(), total_len as u16, src, dst, prng);
    out[IP_HDR_LEN..ip_hdr_total].copy_from_slice(opts);
    write_tcp_header(out, ip_hdr_total, TCP_HDR_LEN, dst_port, prng);

    write_tcp_checksum(out, ip_hdr_total, total_len, src, dst);

    Ok(total_len)
}

fn check_options(opts: &[u8]) -> Result<()> {
    if opts.len() % 4 != 0 {
        return Err(Error::UnalignedOptions(opts.len()));
    }
    Ok(())
}

fn check_capacity(out: &[u8], needed: usize) -> Result<()> {
    if out.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    Ok(())
}

/// Write the IPv4 header at `out[0..20]` and checksum its fixed part.
fn write_ip_header(
    out: &mut [u8],
    ip_options_len: usize,
    total_len: u16,
    src: Ipv4Addr,
    dst: Ipv4Addr,
    prng: &mut XorShift64,
) {
    let ihl = ((IP_HDR_LEN + ip_options_len) / 4) as u8;

    out[0] = (4 << 4) | ihl;
    out[1] = 0; // TOS; DSCP/ECN not populated
    out[2..4].copy_from_slice(&total_len.to_be_bytes());

    // id is a struct-field write, not htons'd
    let id = ((prng.next_u64() & 0xffff) as u16).wrapping_add(1);
    out[4..6].copy_from_slice(&id.to_ne_bytes());

    out[6..8].copy_from_slice(&[0, 0]); // flags + fragment offset
    out[8] = 255; // TTL
    out[9] = 6; // IPPROTO_TCP
    out[10..12].copy_from_slice(&[0, 0]); // checksum, zero for computation
    out[12..16].copy_from_slice(&src.octets());
    out[16..20].copy_from_slice(&dst.octets());

    // the header checksum covers the fixed 20 bytes only, options are
    // excluded, and the result is stored like the id field above
    let check = checksum(&out[..IP_HDR_LEN]);
    out[10..12].copy_from_slice(&check.to_ne_bytes());
}

/// Write a TCP SYN header at `out[offset..offset + 20]`.
///
/// `segment_len` is the header plus any TCP options, which sets the data
/// offset nibble. The checksum field is left zero for
/// [`write_tcp_checksum`].
fn write_tcp_header(
    out: &mut [u8],
    offset: usize,
    segment_len: usize,
    dst_port: u16,
    prng: &mut XorShift64,
) {
    let hdr = &mut out[offset..offset + TCP_HDR_LEN];

    let src_port = ((prng.next_u64() & 0xffff) as u16).wrapping_add(1);
    hdr[0..2].copy_from_slice(&src_port.to_ne_bytes());
    hdr[2..4].copy_from_slice(&dst_port.to_be_bytes());

    let seq = (prng.next_u64() & 0xffff) as u32 + 1;
    hdr[4..8].copy_from_slice(&seq.to_ne_bytes());
    hdr[8..12].copy_from_slice(&[0, 0, 0, 0]); // ack

    hdr[12] = ((segment_len / 4) as u8) << 4; // data offset
    hdr[13] = TCP_FLAG_SYN;
    hdr[14..16].copy_from_slice(&TCP_WINDOW.to_be_bytes());
    hdr[16..18].copy_from_slice(&[0, 0]); // checksum, filled in later
    hdr[18..20].copy_from_slice(&[0, 0]); // urgent pointer
}

/// Compute the TCP checksum over the pseudo-header and the segment, and
/// write it big-endian into the header at `tcp_offset`.
fn write_tcp_checksum(out: &mut [u8], tcp_offset: usize, total_len: usize, src: Ipv4Addr, dst: Ipv4Addr) {
    let seg_len = (total_len - tcp_offset) as u16;

    let mut scratch = [0u8; 12 + SEND_BUF_LEN];
    scratch[0..4].copy_from_slice(&src.octets());
    scratch[4..8].copy_from_slice(&dst.octets());
    scratch[8] = 0;
    scratch[9] = 6; // IPPROTO_TCP
    scratch[10..12].copy_from_slice(&seg_len.to_be_bytes());
    scratch[12..12 + seg_len as usize].copy_from_slice(&out[tcp_offset..total_len]);

    let check = checksum(&scratch[..12 + seg_len as usize]);
    out[tcp_offset + 16..tcp_offset + 18].copy_from_slice(&check.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);
    const DST: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);

    #[test]
    fn test_checksum_reference_vector() {
        let input: [u8; 18] = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xc0, 0xa8, 0x00, 0x01,
            0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(checksum(&input), 0xb861);
    }

    #[test]
    fn test_checksum_odd_trailing_byte() {
        // the odd byte joins the low half of the sum
        assert_eq!(checksum(&[0x01]), !0x0001);
        assert_eq!(checksum(&[0x00, 0x01, 0x02]), !0x0003u16);
    }

    #[test]
    fn test_build_tcp_length() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x02, 0x04, 0xde, 0xad];
        let len = build_tcp(&mut out, &opts, SRC, DST, 5555, &mut prng).unwrap();
        assert_eq!(len, 44);
    }

    #[test]
    fn test_build_ip_length() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x01, 0x01, 0x00, 0x00];
        let len = build_ip(&mut out, &opts, SRC, DST, 5555, &mut prng).unwrap();
        assert_eq!(len, 44);
    }

    #[test]
    fn test_build_tcp_byte_layout() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x02, 0x04, 0xde, 0xad];
        let len = build_tcp(&mut out, &opts, SRC, DST, 5555, &mut prng).unwrap();

        assert_eq!(out[0], 0x45); // version 4, IHL 5
        assert_eq!(out[2..4], 44u16.to_be_bytes());
        assert_eq!(out[8], 255); // TTL
        assert_eq!(out[9], 6); // protocol
        assert_eq!(out[12..16], SRC.octets());
        assert_eq!(out[16..20], DST.octets());

        // TCP header directly behind the fixed IP header
        assert_eq!(out[22..24], 5555u16.to_be_bytes());
        assert_eq!(out[32] >> 4, 6); // data offset: (20 + 4) / 4
        assert_eq!(out[33], TCP_FLAG_SYN);
        assert_eq!(out[34..36], TCP_WINDOW.to_be_bytes());

        // options trail the segment
        assert_eq!(out[len - 4..len], opts);
    }

    #[test]
    fn test_build_ip_byte_layout() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x07, 0x04, 0xaa, 0xbb];
        let len = build_ip(&mut out, &opts, SRC, DST, 80, &mut prng).unwrap();

        assert_eq!(out[0], 0x46); // version 4, IHL 6: 24 header bytes
        assert_eq!(out[2..4], 44u16.to_be_bytes());
        // options live inside the IP header's option area
        assert_eq!(out[20..24], opts);
        // TCP header after the options, bare 20 bytes
        assert_eq!(out[26..28], 80u16.to_be_bytes());
        assert_eq!(out[36] >> 4, 5); // data offset
        assert_eq!(out[37], TCP_FLAG_SYN);
        assert_eq!(len, 44);
    }

    #[test]
    fn test_ip_checksum_covers_fixed_header_only() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x07, 0x04, 0xaa, 0xbb];
        build_ip(&mut out, &opts, SRC, DST, 80, &mut prng).unwrap();

        // recompute over the fixed 20 bytes with the checksum zeroed; the
        // stored value must match, proving options were excluded
        let mut fixed = [0u8; IP_HDR_LEN];
        fixed.copy_from_slice(&out[..IP_HDR_LEN]);
        let stored = u16::from_ne_bytes([fixed[10], fixed[11]]);
        fixed[10] = 0;
        fixed[11] = 0;
        assert_eq!(checksum(&fixed), stored);
    }

    #[test]
    fn test_tcp_checksum_verifies_over_pseudo_header() {
        let mut prng = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let opts = [0x02, 0x04, 0xde, 0xad];
        let len = build_tcp(&mut out, &opts, SRC, DST, 5555, &mut prng).unwrap();

        // summing pseudo-header + segment with the stored checksum in
        // place must yield the all-ones complement zero
        let seg_len = (len - IP_HDR_LEN) as u16;
        let mut scratch = Vec::new();
        scratch.extend_from_slice(&SRC.octets());
        scratch.extend_from_slice(&DST.octets());
        scratch.extend_from_slice(&[0, 6]);
        scratch.extend_from_slice(&seg_len.to_be_bytes());
        // the stored checksum is big-endian, so fold it back in as-is
        scratch.extend_from_slice(&out[IP_HDR_LEN..len]);
        assert_eq!(checksum(&scratch), 0);
    }

    #[test]
    fn test_unaligned_options_rejected() {
        let mut prng = XorShift64::new(1).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        let err = build_tcp(&mut out, &[0x01; 3], SRC, DST, 80, &mut prng).unwrap_err();
        assert!(matches!(err, Error::UnalignedOptions(3)));
    }

    #[test]
    fn test_buffer_too_small_rejected() {
        let mut prng = XorShift64::new(1).unwrap();
        let mut out = [0u8; 16];
        let err = build_tcp(&mut out, &[], SRC, DST, 80, &mut prng).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                needed: 40,
                available: 16
            }
        ));
    }

    #[test]
    fn test_builders_draw_three_prng_values() {
        let mut a = XorShift64::new(0xdeadbeef).unwrap();
        let mut b = XorShift64::new(0xdeadbeef).unwrap();
        let mut out = [0u8; SEND_BUF_LEN];
        build_tcp(&mut out, &[], SRC, DST, 80, &mut a).unwrap();
        for _ in 0..3 {
            b.next_u64();
        }
        assert_eq!(a, b);
    }
}
