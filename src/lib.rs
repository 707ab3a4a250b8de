//! Cross-thread data exchange for an audio plugin that embeds a rendering
//! engine as its UI.
//!
//! Three domains run at different rates inside one plugin process: a
//! hard-real-time audio thread, a frame-paced presentation/UI thread, and a
//! render engine thread that produces video frames and consumes injected
//! input. This crate is the exchange layer between them (fixed-capacity
//! lock-free SPSC queues, atomic parameter cells, and a double-buffered frame
//! transport), built under one constraint: the audio thread never blocks,
//! allocates, or takes a lock.
//!
//! # Primary API
//!
//! - [`Bridge`] / [`BridgeBuilder`]: per-instance context, split into role
//!   handles
//! - [`DspHandle`]: audio thread. Parameter reads, metering production
//! - [`PresentationHandle`]: UI thread. Parameter writes, metering drain,
//!   frame presentation, input and resize production
//! - [`EngineHandle`]: render thread. Frame submission, input drain, resize
//!   consumption
//!
//! The raw channel types ([`RingChannel`], [`FrameChannel`], ...) are public
//! for integrations that manage thread roles themselves; each documents the
//! single-producer/single-consumer contract it relies on, and where that
//! contract cannot be expressed in the type (the frame channel's consumer
//! side) the methods are `unsafe fn`.
//!
//! # Example
//!
//! ```
//! use satbridge::{Bridge, Param, VisualizationSnapshot};
//!
//! let handles = Bridge::builder().initial_size(800, 450).build()?;
//!
//! // UI thread
//! handles.presentation.set_param(Param::Fatness, 0.5);
//!
//! // Audio thread
//! let drive = handles.dsp.param(Param::Fatness);
//! handles.dsp.produce_visualization(VisualizationSnapshot {
//!     peak_left: drive,
//!     ..Default::default()
//! });
//! # Ok::<(), satbridge::Error>(())
//! ```
//!
//! Coalescing is explicit and intentional: the metering queue drains to the
//! newest snapshot, the size slot keeps only the latest request, and a full
//! queue drops the newest item rather than block. Staleness is always
//! preferred over blocking.

pub mod error;
pub use error::{Error, Result};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

mod ring;
pub use ring::RingChannel;

mod params;
pub use params::{Param, ParameterChannel};

mod visualization;
pub use visualization::{VisualizationChannel, VisualizationSnapshot, VISUALIZATION_QUEUE_CAPACITY};

mod frame;
pub use frame::{FrameChannel, BYTES_PER_PIXEL};

mod input;
pub use input::{InputEvent, InputEventChannel, INPUT_QUEUE_CAPACITY};

mod size;
pub use size::SizeRequestChannel;

mod bridge;
pub use bridge::{
    Bridge, BridgeBuilder, BridgeHandles, BridgeState, DspHandle, EngineHandle, InstanceId,
    PresentationHandle,
};
