//! Plugin shared between execution contexts
//!
//! A poll and a settings reload must never interleave: a reload swaps the
//! calibration and the whole object list, and a half-swapped list would
//! break the index-order tie-break. [`SharedTouchPlugin`] serializes every
//! access inside a critical section, so the touch task and, for example, a
//! configuration task can both hold a `&'static` reference to it.
//!
//! # Example
//!
//! ```ignore
//! use static_cell::StaticCell;
//!
//! static TOUCH: StaticCell<SharedTouchPlugin<Xpt2046>> = StaticCell::new();
//!
//! let touch = TOUCH.init(SharedTouchPlugin::new(TouchPlugin::new()));
//! touch.init(task, controller, config, &mut store)?;
//!
//! // touch task
//! if let Some(report) = touch.poll()? { /* publish */ }
//!
//! // config task
//! touch.load_settings(task, &mut store)?;
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::config::TouchConfig;
use crate::controller::TouchController;
use crate::plugin::{TouchError, TouchPlugin, TouchReport};
use crate::settings::{SettingsStore, TaskIndex};

pub struct SharedTouchPlugin<C> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<TouchPlugin<C>>>,
}

impl<C> SharedTouchPlugin<C>
where
    C: TouchController,
{
    pub const fn new(plugin: TouchPlugin<C>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(plugin)),
        }
    }

    /// Run `f` with exclusive access to the plugin.
    ///
    /// `f` must not call back into this `SharedTouchPlugin`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut TouchPlugin<C>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn init<S: SettingsStore>(
        &self,
        task: TaskIndex,
        controller: C,
        config: TouchConfig,
        store: &mut S,
    ) -> Result<(), TouchError> {
        self.lock(|plugin| plugin.init(task, controller, config, store))
    }

    pub fn poll(&self) -> Result<Option<TouchReport>, TouchError> {
        self.lock(|plugin| plugin.poll())
    }

    pub fn load_settings<S: SettingsStore>(
        &self,
        task: TaskIndex,
        store: &mut S,
    ) -> Result<(), TouchError> {
        self.lock(|plugin| plugin.load_settings(task, store))
    }

    pub fn is_initialized(&self) -> bool {
        self.lock(|plugin| plugin.is_initialized())
    }

    pub fn into_inner(self) -> TouchPlugin<C> {
        self.inner.into_inner().into_inner()
    }
}
