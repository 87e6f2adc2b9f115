// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-SoC platform glue: bind/unbind and the attach/detach protocol.
//!
//! A [`SocAdapter`] owns exactly one controller context, zero-or-one TE
//! interrupt binding, and (once bound) one output node registered with the
//! composition pipeline. The TE binding, when present, exists only between
//! a successful command-mode attach and the matching detach.
//!
//! # Ordering guarantees
//!
//! Attach registers the TE interrupt (still disabled) before the pipeline
//! learns about the new topology, so no frame can be pushed before the
//! interrupt exists. Detach notifies the pipeline first, then tears the
//! interrupt down, then clears the flip target — after `detach` returns,
//! no pulse can fire referencing the detached device.

use std::fmt;
use std::sync::{Arc, Mutex};

use geyser_core::chain::{ChainError, DisplayChain};
use geyser_core::error::{AttachError, BindError};
use geyser_core::irq::{IrqHooks, TeBinding};
use geyser_core::link::LinkConfig;
use geyser_core::output::{DisplayClass, OutputId};
use geyser_core::panel::PanelDevice;

use crate::context::DsiHost;
use crate::router::TeRouter;
use crate::sync::lock;

/// Platform glue binding one host controller to a composition pipeline.
pub struct SocAdapter {
    host: Arc<DsiHost>,
    router: Arc<TeRouter>,
    output: Mutex<Option<OutputId>>,
    te: Mutex<Option<Box<dyn TeBinding>>>,
}

impl SocAdapter {
    /// Creates the glue for a discovered controller.
    ///
    /// Registration with the component framework is the platform's concern;
    /// once probed, the adapter waits for [`bind`](Self::bind).
    #[must_use]
    pub fn probe(host: Arc<DsiHost>) -> Self {
        let router = Arc::new(TeRouter::new(host.clone()));
        Self {
            host,
            router,
            output: Mutex::new(None),
            te: Mutex::new(None),
        }
    }

    /// The controller context this adapter owns.
    #[must_use]
    pub fn host(&self) -> &Arc<DsiHost> {
        &self.host
    }

    /// The output node id, once bound.
    #[must_use]
    pub fn output(&self) -> Option<OutputId> {
        *lock(&self.output)
    }

    /// Composition bind: creates this controller's output node, making the
    /// host reachable as a packet-transport host.
    ///
    /// # Errors
    ///
    /// [`BindError::AlreadyBound`] on a second bind without an unbind in
    /// between; [`BindError::Chain`] when the pipeline cannot register the
    /// node.
    pub fn bind<C: DisplayChain>(&self, chain: &C) -> Result<OutputId, BindError> {
        let mut slot = lock(&self.output);
        if slot.is_some() {
            return Err(BindError::AlreadyBound);
        }
        let output = chain.create_output(DisplayClass::Lcd)?;
        *slot = Some(output);
        log::debug!(
            "host {:?}: bound as output {:?}",
            self.host.token(),
            output
        );
        Ok(output)
    }

    /// Composition unbind: tears down whatever a missing detach left
    /// behind, then removes the output node. Idempotent.
    pub fn unbind<C: DisplayChain>(&self, chain: &C) {
        if lock(&self.te).is_some() {
            log::warn!(
                "host {:?}: unbinding with a live te binding; device never detached",
                self.host.token()
            );
            self.release_te();
        }
        self.host.clear_flip_target();
        if let Some(output) = lock(&self.output).take() {
            chain.remove_output(output);
            log::debug!("host {:?}: unbound output {:?}", self.host.token(), output);
        }
    }

    /// Runs the attach handshake for a panel device registering against
    /// the host.
    ///
    /// On success the negotiated parameters are stable in the controller
    /// context, the pipeline's on-demand flag mirrors the mode decision,
    /// and the TE interrupt — registered only for command-mode devices with
    /// a TE line — is present but disabled.
    ///
    /// # Errors
    ///
    /// Any failing step aborts the whole attach; partially acquired
    /// resources are released before the error is returned.
    pub fn attach<C: DisplayChain>(
        &self,
        chain: &C,
        device: &dyn PanelDevice,
    ) -> Result<(), AttachError> {
        let output = self.output().ok_or(AttachError::NotBound)?;
        chain.connect_output(output)?;

        let info = device.info();
        let command_mode = info.mode.is_command_mode();

        // Only command-mode panels signal frame consumption over TE; a
        // missing line is fine, any other claim failure aborts.
        let binding = if command_mode {
            match device.claim_te(self.router.clone()) {
                Ok(binding) => binding,
                Err(err) => {
                    log::error!("host {:?}: te line request failed: {err}", self.host.token());
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let Some(crtc) = chain.crtc_by_class(DisplayClass::Lcd) else {
            if let Some(binding) = binding {
                if let Err(err) = binding.release() {
                    log::warn!(
                        "host {:?}: te release during aborted attach failed: {err}",
                        self.host.token()
                    );
                }
            }
            return Err(ChainError::NoCrtc(DisplayClass::Lcd).into());
        };

        chain.with_config(|config| {
            self.host.set_link_config(LinkConfig {
                lanes: info.lanes,
                format: info.format,
                mode: info.mode,
            });
            config.set_on_demand(crtc, command_mode);
        });

        self.host.set_flip_target(chain.flip_sink(crtc));

        if let Some(binding) = binding {
            let stale = lock(&self.te).replace(binding);
            if let Some(stale) = stale {
                log::warn!(
                    "host {:?}: replacing a te binding left over from a previous attach",
                    self.host.token()
                );
                if let Err(err) = stale.release() {
                    log::warn!("host {:?}: stale te release failed: {err}", self.host.token());
                }
            }
        }

        if chain.poll_enabled() {
            chain.notify_hotplug();
        }

        log::debug!(
            "host {:?}: attached {} panel, lanes={} format={:?}",
            self.host.token(),
            if command_mode { "command-mode" } else { "video-mode" },
            info.lanes,
            info.format
        );
        Ok(())
    }

    /// Runs the detach handshake. Teardown always succeeds.
    ///
    /// The topology notification is emitted first, while the device is
    /// still nominally present; the TE binding, if any, is then disabled
    /// and released, and the flip target cleared. Detaching a device that
    /// never registered TE is a no-op on the interrupt side.
    ///
    /// # Errors
    ///
    /// None in practice; the `Result` mirrors the device-model signature.
    pub fn detach<C: DisplayChain>(
        &self,
        chain: &C,
        _device: &dyn PanelDevice,
    ) -> Result<(), AttachError> {
        if chain.poll_enabled() {
            chain.notify_hotplug();
        }
        self.release_te();
        self.host.clear_flip_target();
        log::debug!("host {:?}: detached", self.host.token());
        Ok(())
    }

    /// Disables and releases the TE binding, if one exists. A release
    /// failure is logged and must not prevent further teardown.
    fn release_te(&self) {
        let binding = lock(&self.te).take();
        if let Some(binding) = binding {
            binding.disable();
            if let Err(err) = binding.release() {
                log::warn!(
                    "host {:?}: te interrupt release failed: {err}; continuing teardown",
                    self.host.token()
                );
            }
        }
    }
}

impl IrqHooks for SocAdapter {
    fn enable_te(&self) {
        if let Some(binding) = lock(&self.te).as_ref() {
            binding.enable();
        }
    }

    fn disable_te(&self) {
        if let Some(binding) = lock(&self.te).as_ref() {
            binding.disable();
        }
    }
}

impl fmt::Debug for SocAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocAdapter")
            .field("host", &self.host)
            .field("output", &self.output())
            .field("has_te_binding", &lock(&self.te).is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geyser_core::chain::{ChainError, DisplayChain, FlipSink, ScanoutConfig};
    use geyser_core::error::{AttachError, BindError};
    use geyser_core::irq::{IrqError, TeBinding, TePulse};
    use geyser_core::link::{ModeFlags, PixelFormat};
    use geyser_core::output::{AdapterToken, CrtcId, DisplayClass, OutputId};
    use geyser_core::panel::{PanelDevice, PanelInfo};

    use super::SocAdapter;
    use crate::context::DsiHost;

    /// Chain double that accepts one output and has no CRTC at all.
    #[derive(Debug, Default)]
    struct CrtclessChain;

    #[derive(Debug)]
    struct NullSink;

    impl FlipSink for NullSink {
        fn frame_consumed(&self) {}
    }

    struct IgnoreConfig;

    impl ScanoutConfig for IgnoreConfig {
        fn set_on_demand(&mut self, _crtc: CrtcId, _on_demand: bool) {}
    }

    impl DisplayChain for CrtclessChain {
        fn create_output(&self, _class: DisplayClass) -> Result<OutputId, ChainError> {
            Ok(OutputId(7))
        }

        fn remove_output(&self, _output: OutputId) {}

        fn connect_output(&self, _output: OutputId) -> Result<(), ChainError> {
            Ok(())
        }

        fn crtc_by_class(&self, _class: DisplayClass) -> Option<CrtcId> {
            None
        }

        fn flip_sink(&self, _crtc: CrtcId) -> Arc<dyn FlipSink> {
            Arc::new(NullSink)
        }

        fn with_config<R>(&self, f: impl FnOnce(&mut dyn ScanoutConfig) -> R) -> R {
            f(&mut IgnoreConfig)
        }

        fn poll_enabled(&self) -> bool {
            false
        }

        fn notify_hotplug(&self) {}
    }

    #[derive(Debug)]
    struct VideoPanel;

    impl PanelDevice for VideoPanel {
        fn info(&self) -> PanelInfo {
            PanelInfo {
                lanes: 4,
                format: PixelFormat::Rgb888,
                mode: ModeFlags::VIDEO,
            }
        }

        fn claim_te(
            &self,
            _handler: Arc<dyn TePulse>,
        ) -> Result<Option<Box<dyn TeBinding>>, IrqError> {
            panic!("video-mode attach must never try to claim te");
        }
    }

    fn adapter() -> SocAdapter {
        SocAdapter::probe(Arc::new(DsiHost::new(AdapterToken(0xa11))))
    }

    #[test]
    fn attach_before_bind_is_rejected() {
        let adapter = adapter();
        let err = adapter
            .attach(&CrtclessChain, &VideoPanel)
            .expect_err("unbound adapter");
        assert_eq!(err, AttachError::NotBound);
    }

    #[test]
    fn double_bind_is_rejected() {
        let adapter = adapter();
        let chain = CrtclessChain;
        adapter.bind(&chain).expect("first bind");
        assert_eq!(
            adapter.bind(&chain).expect_err("second bind"),
            BindError::AlreadyBound
        );
    }

    #[test]
    fn missing_crtc_aborts_attach() {
        let adapter = adapter();
        let chain = CrtclessChain;
        adapter.bind(&chain).expect("bind");
        let err = adapter
            .attach(&chain, &VideoPanel)
            .expect_err("no CRTC registered");
        assert_eq!(
            err,
            AttachError::Chain(ChainError::NoCrtc(DisplayClass::Lcd))
        );
    }

    #[test]
    fn unbind_allows_rebinding() {
        let adapter = adapter();
        let chain = CrtclessChain;
        adapter.bind(&chain).expect("first bind");
        adapter.unbind(&chain);
        adapter.bind(&chain).expect("rebind after unbind");
    }
}
