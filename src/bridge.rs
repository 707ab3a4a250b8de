//! The per-instance bridge context and its role handles.
//!
//! One `Bridge` exists per active plugin instance. It is constructed
//! explicitly by the integration layer and handed around as `Arc<Bridge>`;
//! there is no process-global singleton, so several simultaneous instances in
//! one process cannot collide.
//!
//! The single-producer/single-consumer discipline every channel relies on is
//! enforced structurally: `build()` returns exactly one handle per thread
//! role, the handles are `Send` but not `Clone`, and each exposes only the
//! operations its role is allowed to perform.

use crate::error::{Error, Result};
use crate::frame::FrameChannel;
use crate::input::{InputEvent, InputEventChannel};
use crate::params::{Param, ParameterChannel};
use crate::size::SizeRequestChannel;
use crate::visualization::{VisualizationChannel, VisualizationSnapshot};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identity of a bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Bridge lifecycle. One-directional: `Active` on construction, `Destroyed`
/// after [`Bridge::shutdown`]. Channel operations are valid only while
/// `Active`; debug builds assert, release builds trust the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BridgeState {
    Active = 0,
    Destroyed = 1,
}

/// Shared context aggregating one instance of every channel plus parameter
/// storage.
pub struct Bridge {
    id: InstanceId,
    state: AtomicU8,
    params: ParameterChannel,
    visualization: VisualizationChannel,
    frames: FrameChannel,
    input: InputEventChannel,
    size: SizeRequestChannel,
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    pub fn state(&self) -> BridgeState {
        match self.state.load(Ordering::Acquire) {
            0 => BridgeState::Active,
            _ => BridgeState::Destroyed,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == BridgeState::Active as u8
    }

    /// Transition to `Destroyed`. Called from host plugin teardown.
    ///
    /// Idempotent; the transition is one-directional and cannot be undone.
    pub fn shutdown(&self) {
        let was = self.state.compare_exchange(
            BridgeState::Active as u8,
            BridgeState::Destroyed as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if was.is_ok() {
            debug!(instance = self.id.get(), "bridge shut down");
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for a [`Bridge`] instance.
///
/// The only tunable is the initial viewport size reported by
/// `SizeRequestChannel::peek` before the first resize; queue capacities are
/// fixed at compile time.
pub struct BridgeBuilder {
    initial_width: u32,
    initial_height: u32,
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self {
            initial_width: 600,
            initial_height: 400,
        }
    }
}

impl BridgeBuilder {
    pub fn initial_size(mut self, width: u32, height: u32) -> Self {
        self.initial_width = width;
        self.initial_height = height;
        self
    }

    /// Construct the bridge and split it into one handle per thread role.
    pub fn build(self) -> Result<BridgeHandles> {
        if self.initial_width == 0 || self.initial_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "initial size must be non-zero, got {}x{}",
                self.initial_width, self.initial_height
            )));
        }

        let bridge = Arc::new(Bridge {
            id: InstanceId::next(),
            state: AtomicU8::new(BridgeState::Active as u8),
            params: ParameterChannel::new(),
            visualization: VisualizationChannel::new(),
            frames: FrameChannel::new(),
            input: InputEventChannel::new(),
            size: SizeRequestChannel::new(self.initial_width, self.initial_height),
        });

        debug!(
            instance = bridge.id.get(),
            width = self.initial_width,
            height = self.initial_height,
            "bridge constructed"
        );

        Ok(BridgeHandles {
            dsp: DspHandle {
                bridge: Arc::clone(&bridge),
            },
            presentation: PresentationHandle {
                bridge: Arc::clone(&bridge),
            },
            engine: EngineHandle {
                bridge: Arc::clone(&bridge),
            },
            context: bridge,
        })
    }
}

/// The split bridge: one handle per thread role plus the shared context for
/// lifecycle control.
pub struct BridgeHandles {
    /// Audio/DSP thread handle. Wait-free operations only.
    pub dsp: DspHandle,
    /// UI/presentation thread handle.
    pub presentation: PresentationHandle,
    /// Render engine thread handle.
    pub engine: EngineHandle,
    /// Shared context, for `shutdown()` and state queries from the
    /// integration layer.
    pub context: Arc<Bridge>,
}

/// Audio thread end of the bridge. Everything reachable from here is
/// wait-free: no locks, no allocation, no logging.
pub struct DspHandle {
    bridge: Arc<Bridge>,
}

impl DspHandle {
    /// Read a parameter. Called once per parameter per audio block.
    #[inline]
    pub fn param(&self, param: Param) -> f32 {
        debug_assert!(self.bridge.is_active());
        self.bridge.params.get(param)
    }

    /// Publish one metering snapshot. Called once per audio block; silently
    /// lossy on overflow.
    #[inline]
    pub fn produce_visualization(&self, snapshot: VisualizationSnapshot) {
        debug_assert!(self.bridge.is_active());
        self.bridge.visualization.produce(snapshot);
    }

    pub fn is_active(&self) -> bool {
        self.bridge.is_active()
    }
}

/// UI/presentation thread end of the bridge: parameter writes, metering
/// drain, frame acquisition, input and resize production.
pub struct PresentationHandle {
    bridge: Arc<Bridge>,
}

impl PresentationHandle {
    /// Write a parameter on user gesture or host automation.
    #[inline]
    pub fn set_param(&self, param: Param, value: f32) {
        debug_assert!(self.bridge.is_active());
        self.bridge.params.set(param, value);
    }

    /// Read a parameter back, e.g. to refresh a control after automation.
    #[inline]
    pub fn param(&self, param: Param) -> f32 {
        self.bridge.params.get(param)
    }

    /// Restore every parameter to its default.
    pub fn reset_params(&self) {
        debug_assert!(self.bridge.is_active());
        self.bridge.params.reset();
    }

    /// Drain queued metering snapshots, keeping the newest. Once per refresh
    /// tick.
    pub fn drain_visualization(&self) -> Option<VisualizationSnapshot> {
        debug_assert!(self.bridge.is_active());
        self.bridge.visualization.drain_latest()
    }

    /// Swap in the newest rendered frame if one is pending. Once per display
    /// refresh.
    ///
    /// `&mut self` ties outstanding [`frame_data`](Self::frame_data) borrows
    /// to the swap: a stale pixel slice cannot survive an acquire.
    pub fn acquire_frame(&mut self) -> bool {
        debug_assert!(self.bridge.is_active());
        // SAFETY: this handle is the only consumer-side accessor of the frame
        // channel and is not Clone; `&mut self` excludes every live slice
        // handed out by `frame_data`.
        unsafe { self.bridge.frames.acquire_latest() }
    }

    /// Pixels of the last acquired frame; empty before the first acquire.
    ///
    /// The slice borrows this handle, so it cannot outlive the next
    /// [`acquire_frame`](Self::acquire_frame).
    pub fn frame_data(&self) -> &[u8] {
        // SAFETY: sole consumer handle; the `&self` borrow blocks
        // `acquire_frame(&mut self)` for as long as the slice lives.
        unsafe { self.bridge.frames.data() }
    }

    pub fn frame_width(&self) -> u32 {
        // SAFETY: sole consumer handle, as for `frame_data`.
        unsafe { self.bridge.frames.width() }
    }

    pub fn frame_height(&self) -> u32 {
        // SAFETY: sole consumer handle, as for `frame_data`.
        unsafe { self.bridge.frames.height() }
    }

    /// Forward a raw input event to the render engine.
    #[inline]
    pub fn push_input(&self, event: InputEvent) -> bool {
        debug_assert!(self.bridge.is_active());
        self.bridge.input.push(event)
    }

    pub fn push_mouse_motion(&self, x: f32, y: f32) -> bool {
        self.push_input(InputEvent::MouseMotion { x, y })
    }

    pub fn push_mouse_button(&self, x: f32, y: f32, button: u32, pressed: bool) -> bool {
        self.push_input(InputEvent::MouseButton {
            x,
            y,
            button,
            pressed,
        })
    }

    pub fn push_scroll(&self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        self.push_input(InputEvent::Scroll { x, y, dx, dy })
    }

    pub fn push_key(&self, code: u32, pressed: bool) -> bool {
        self.push_input(InputEvent::Key { code, pressed })
    }

    /// Request a viewport resize. Latest request wins.
    pub fn request_size(&self, width: u32, height: u32) {
        debug_assert!(self.bridge.is_active());
        self.bridge.size.set(width, height);
    }

    pub fn is_active(&self) -> bool {
        self.bridge.is_active()
    }
}

/// Render engine thread end of the bridge: frame submission, input drain,
/// resize consumption.
pub struct EngineHandle {
    bridge: Arc<Bridge>,
}

impl EngineHandle {
    /// Publish a rendered RGBA8 frame. Once per rendered frame; rejects
    /// invalid dimensions as a no-op.
    pub fn submit_frame(&self, pixels: &[u8], width: u32, height: u32) -> bool {
        debug_assert!(self.bridge.is_active());
        self.bridge.frames.submit(pixels, width, height)
    }

    /// Dequeue the oldest injected input event. Drain in a loop each
    /// iteration.
    #[inline]
    pub fn pop_input(&self) -> Option<InputEvent> {
        debug_assert!(self.bridge.is_active());
        self.bridge.input.pop()
    }

    /// Consume a pending resize request, if any.
    pub fn take_size_request(&self) -> Option<(u32, u32)> {
        debug_assert!(self.bridge.is_active());
        self.bridge.size.take_if_changed()
    }

    /// Current requested size, without consuming the pending flag.
    pub fn peek_size(&self) -> (u32, u32) {
        self.bridge.size.peek()
    }

    pub fn is_active(&self) -> bool {
        self.bridge.is_active()
    }
}
