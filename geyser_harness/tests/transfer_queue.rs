// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transfer-queue contract scenarios against the FIFO engine double.

use std::sync::Arc;

use geyser_core::output::AdapterToken;
use geyser_core::packet::{Packet, TransferError};
use geyser_harness::{EngineThread, FifoEngine};
use geyser_host::context::DsiHost;
use geyser_host::transfer::Transfer;

fn host() -> Arc<DsiHost> {
    Arc::new(DsiHost::new(AdapterToken(0xf1f0)))
}

#[test]
fn engine_completes_in_enqueue_order() {
    let host = host();
    let engine = FifoEngine::new(host.clone());

    let transfers: Vec<Arc<Transfer>> = (1..=5_u8)
        .map(|n| Arc::new(Transfer::write(Packet::from_header([n, 0, 0, 0]))))
        .collect();
    for transfer in &transfers {
        host.enqueue(Arc::clone(transfer));
    }

    assert_eq!(engine.service_all(), 5);
    let order: Vec<u8> = engine.completed().iter().map(|h| h[0]).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5], "records serviced in enqueue order");

    for transfer in &transfers {
        assert_eq!(transfer.result(), Some(Ok(())));
    }
}

#[test]
fn wait_blocks_until_the_engine_services_the_record() {
    let host = host();
    let service = EngineThread::spawn(host.clone());

    let packet = Packet::new([0x39, 0x02, 0x00, 0x00], vec![0x51, 0xff]);
    let size = packet.size();
    let transfer = Arc::new(Transfer::write(packet));
    host.enqueue(Arc::clone(&transfer));

    assert_eq!(transfer.wait(), Ok(()));
    assert_eq!(usize::from(transfer.progress().0), size);
    service.stop();
}

#[test]
fn scripted_reply_reaches_the_receive_buffer() {
    let host = host();
    let engine = FifoEngine::new(host.clone());
    engine.push_reply(vec![0x1c, 0x2d, 0x3e]);

    let transfer = Arc::new(Transfer::read(Packet::from_header([0x06, 0x0a, 0, 0]), 8));
    host.enqueue(Arc::clone(&transfer));
    engine.service_all();

    assert_eq!(transfer.wait(), Ok(()));
    assert_eq!(transfer.take_rx(), vec![0x1c, 0x2d, 0x3e]);
    assert_eq!(transfer.progress().1, 3);
}

#[test]
fn oversized_reply_surfaces_rx_overflow() {
    let host = host();
    let engine = FifoEngine::new(host.clone());
    engine.push_reply(vec![0; 9]);

    let transfer = Arc::new(Transfer::read(Packet::from_header([0x06, 0x0a, 0, 0]), 4));
    host.enqueue(Arc::clone(&transfer));
    engine.service_all();

    assert_eq!(transfer.wait(), Err(TransferError::RxOverflow));
}

#[test]
fn enqueue_returns_before_completion() {
    let host = host();
    let transfer = Arc::new(Transfer::write(Packet::from_header([1, 0, 0, 0])));
    host.enqueue(Arc::clone(&transfer));

    // Nothing serviced the queue yet; the record is pending, not completed.
    assert_eq!(host.pending(), 1);
    assert_eq!(transfer.result(), None);
}
