// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paced TE delivery through the full attach stack.

use std::sync::Arc;
use std::time::Duration;

use geyser_core::irq::IrqHooks;
use geyser_core::output::AdapterToken;
use geyser_core::state::LinkState;
use geyser_harness::{RecordingChain, ScriptedPanel, SimTeLine, TePacer};
use geyser_host::adapter::SocAdapter;
use geyser_host::context::DsiHost;

#[test]
fn paced_pulses_reach_the_flip_sink_only_while_gated_open() {
    let (chain, crtc) = RecordingChain::with_lcd_crtc();
    let adapter = SocAdapter::probe(Arc::new(DsiHost::new(AdapterToken(0x7e))));
    adapter.bind(&chain).expect("bind");

    let line = SimTeLine::new();
    let panel = ScriptedPanel::command_mode().with_te_line(line.clone());
    adapter.attach(&chain, &panel).expect("attach");

    let pacer = TePacer::spawn(line.clone(), Duration::from_millis(2));

    // Masked and vidout clear: nothing may reach the sink.
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(chain.sink(crtc).count(), 0);
    assert!(line.suppressed() >= 1, "masked edges are dropped, not queued");

    adapter.host().insert_state(LinkState::VIDOUT_AVAILABLE);
    adapter.enable_te();
    std::thread::sleep(Duration::from_millis(50));
    pacer.stop();

    let forwarded = chain.sink(crtc).count();
    assert!(forwarded >= 1, "armed pacer must drive at least one flip");
    assert_eq!(line.delivered(), forwarded, "every delivered edge forwards once");
}
