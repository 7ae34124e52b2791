//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements     | Connects to                     |
//! |--------------|----------------|---------------------------------|
//! | `camera`     | CameraPort     | `rpicam-still` child process    |
//! | `env_config` | ConfigPort     | Process environment, JSON file  |
//! | `hardware`   | SensorPort     | Door / PIR drivers over GPIO    |
//! | `log_sink`   | EventSink      | `log` facade → stderr           |
//! | `supabase`   | ObjectStorePort| Supabase Storage REST API       |
//! | `time`       | ClockPort      | Local wall clock                |
//! |              | Sleeper        | SIGINT/SIGTERM-aware sleep      |
//! | `twilio`     | MessagingPort  | Twilio Messages REST API        |

pub mod camera;
pub mod env_config;
pub mod hardware;
pub mod log_sink;
pub mod supabase;
pub mod time;
pub mod twilio;
