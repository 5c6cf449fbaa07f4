//! secretsync - push per-service `.env` files into AWS Secrets Manager.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── sync          # Create or update every service's secret
//! │   ├── check         # Validate config and env files offline
//! │   ├── name          # Print a service's secret name
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # secretsync.toml, env vars, CLI overrides
//!     ├── constants     # Defaults and variable names
//!     ├── domain/       # Mode, SecretId, SecretPayload, run summary
//!     ├── naming        # Secret name and env file path resolution
//!     ├── policy        # Credential key filtering
//!     ├── env           # .env parsing
//!     ├── store/        # Secret store backends
//!     │   ├── mod       # SecretStore trait
//!     │   ├── retry     # Fibonacci backoff wrapper
//!     │   ├── memory    # In-process store
//!     │   └── aws       # AWS Secrets Manager
//!     └── reconcile     # Per-service create-or-update
//! ```
//!
//! # Example
//!
//! ```
//! use secretsync::core::config::Settings;
//! use secretsync::core::domain::Mode;
//! use secretsync::core::reconcile::Reconciler;
//! use secretsync::core::store::MemoryStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("admin")).unwrap();
//! std::fs::write(dir.path().join("admin/.env"), "PORT=8080\n").unwrap();
//!
//! let settings = Settings::new(Mode::Prod, "v1")
//!     .unwrap()
//!     .with_envs_dir(dir.path())
//!     .with_services(["admin"])
//!     .unwrap();
//! let store = MemoryStore::new();
//!
//! let summary = Reconciler::new(&settings, &store).run();
//! assert_eq!(summary.counts.created, 1);
//! assert!(store.get("admin-v1").is_some());
//! ```

pub mod cli;
pub mod core;
pub mod error;
