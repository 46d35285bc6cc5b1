//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                |
//! |---------------|--------------------|----------------------------|
//! | `hardware`    | SensorPort         | moisture / IR / camera     |
//! |               | ActuatorPort       | pump / motor boards        |
//! | `serial`      | TransportFactory   | USB serial ttys            |
//! | `csv_log`     | RecordSink         | CSV file on disk           |
//! | `log_sink`    | EventSink          | `log` facade               |
//! | `time`        | Clock              | host local time            |
//! | `config_file` | ConfigPort         | JSON config file           |

pub mod config_file;
pub mod csv_log;
pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;
