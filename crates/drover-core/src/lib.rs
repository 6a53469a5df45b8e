//! # drover-core
//!
//! Interactive process supervisor core.
//!
//! Launch executables out of a directory, watch their output line by
//! line, and stop or restart them by name. Pairs with the `drover`
//! console for the interactive surface.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use drover_core::{Supervisor, SupervisorConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sup = Supervisor::new(SupervisorConfig {
//!     program_dir: "programs".into(),
//!     stop_grace: Duration::from_secs(5),
//! });
//!
//! let mut events = sup.output.subscribe();
//! sup.launch("web").await.unwrap();
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # }
//! ```

pub mod output;
pub mod registry;
pub mod supervisor;
pub mod types;

mod monitor;

pub use output::{OutputBus, OutputEvent, Source};
pub use registry::{ProcessHandle, ProcessRecord, Registry};
pub use supervisor::{Supervisor, SupervisorConfig};
pub use types::{ProcessState, SupervisorError};
