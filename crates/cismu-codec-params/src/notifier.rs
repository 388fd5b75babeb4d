use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use tracing::{Level, debug, instrument, trace};

use crate::store::ParameterStore;

/// Interesado en cambios de parámetros de códec.
pub trait CodecParametersChangeListener: Send + Sync {
    /// Se llama con los parámetros cambiados cuyas claves están en
    /// [`filter_keys`](Self::filter_keys).
    fn on_codec_parameters_changed(&self, changed: &ParameterStore);

    /// Claves que le interesan a este listener. Lista vacía = nunca se le llama.
    fn filter_keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Arc<dyn CodecParametersChangeListener>;

/// Reparte cambios a los listeners, cada uno con su subconjunto filtrado.
///
/// La entrega es síncrona en el hilo que llama a [`publish`](Self::publish).
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Mutex<HashMap<usize, Listener>>,
    next_id: AtomicUsize,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&self, listener: Arc<L>) -> ListenerId
    where
        L: CodecParametersChangeListener + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry().insert(id, listener);
        ListenerId(id)
    }

    /// Devuelve `false` si el id ya no estaba registrado.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.registry().remove(&id.0).is_some()
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Entrega a cada listener la parte de `store` que le interesa.
    ///
    /// Los listeners sin claves de interés, o sin ninguna clave en común con
    /// `store`, no reciben nada. Devuelve cuántos listeners fueron notificados.
    #[instrument(level = Level::TRACE, skip_all, fields(params = store.len()))]
    pub fn publish(&self, store: &ParameterStore) -> usize {
        // el lock se suelta antes de llamar a nadie
        let snapshot: Vec<(usize, Listener)> = self
            .registry()
            .iter()
            .map(|(id, l)| (*id, Arc::clone(l)))
            .collect();

        let mut notified = 0;
        for (id, listener) in snapshot {
            let keys = listener.filter_keys();
            if keys.is_empty() {
                continue;
            }

            let changed = store.filtered(&keys);
            if changed.is_empty() {
                trace!(listener = id, "no changed key matches the listener filter");
                continue;
            }

            listener.on_codec_parameters_changed(&changed);
            notified += 1;
        }

        debug!(notified, "codec parameter changes published");
        notified
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<usize, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.len())
            .finish()
    }
}
