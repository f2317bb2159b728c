use chronicle_journal::StoredEntity;

/// A post-commit observer: a match predicate over journalled entities and a
/// callback invoked for each match.
///
/// Callbacks run on the partition worker that committed the entity, after
/// the transaction is durable and indices are updated. A slow callback
/// stalls only its own partition.
pub struct Subscription {
    predicate: Box<dyn Fn(&StoredEntity) -> bool + Send + Sync>,
    callback: Box<dyn Fn(&StoredEntity) + Send + Sync>,
}

impl Subscription {
    #[must_use]
    pub fn new(
        predicate: impl Fn(&StoredEntity) -> bool + Send + Sync + 'static,
        callback: impl Fn(&StoredEntity) + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            callback: Box::new(callback),
        }
    }

    /// Convenience constructor matching one entity type by name.
    #[must_use]
    pub fn on_type(
        type_name: &'static str,
        callback: impl Fn(&StoredEntity) + Send + Sync + 'static,
    ) -> Self {
        Self::new(move |entity| entity.type_name() == type_name, callback)
    }

    /// Invokes the callback if the entity matches.
    pub fn deliver(&self, entity: &StoredEntity) {
        if (self.predicate)(entity) {
            (self.callback)(entity);
        }
    }
}
