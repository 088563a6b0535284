//! Transactions started through a [`JetConnection`].

use std::ops::{Deref, DerefMut};

use jetmodel_core::{DriverConnection, DriverTransaction, IsolationLevel, Result};

use crate::connection::JetConnection;

/// An open transaction together with the connection it runs on.
///
/// Derefs to the connection, so commands created while the transaction is alive
/// run inside it. Dropping it without `commit` or `rollback` rolls back.
pub struct JetTransaction<'conn, C: DriverConnection> {
    inner: Option<C::Transaction>,
    requested: IsolationLevel,
    connection: &'conn mut JetConnection<C>,
}

impl<'conn, C: DriverConnection> JetTransaction<'conn, C> {
    pub(crate) fn new(
        tx: C::Transaction,
        requested: IsolationLevel,
        connection: &'conn mut JetConnection<C>,
    ) -> Self {
        Self {
            inner: Some(tx),
            requested,
            connection,
        }
    }

    /// Level the engine is running the transaction at.
    pub fn isolation_level(&self) -> IsolationLevel {
        self.inner
            .as_ref()
            .map_or(self.requested, |tx| tx.isolation_level())
    }

    /// Level the caller asked for.
    pub fn requested_isolation_level(&self) -> IsolationLevel {
        self.requested
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit(mut self) -> Result<()> {
        match self.inner.take() {
            Some(tx) => tx.commit(),
            None => Ok(()),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rollback(mut self) -> Result<()> {
        match self.inner.take() {
            Some(tx) => tx.rollback(),
            None => Ok(()),
        }
    }
}

impl<C: DriverConnection> Deref for JetTransaction<'_, C> {
    type Target = JetConnection<C>;

    fn deref(&self) -> &Self::Target {
        &*self.connection
    }
}

impl<C: DriverConnection> DerefMut for JetTransaction<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.connection
    }
}

impl<C: DriverConnection> Drop for JetTransaction<'_, C> {
    fn drop(&mut self) {
        if let Some(tx) = self.inner.take() {
            tracing::warn!("Transaction dropped without commit or rollback; rolling back");
            if let Err(e) = tx.rollback() {
                tracing::warn!(error = %e, "Rollback on drop failed");
            }
        }
    }
}

impl<C: DriverConnection> std::fmt::Debug for JetTransaction<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JetTransaction")
            .field("requested", &self.requested)
            .field("isolation_level", &self.isolation_level())
            .field("finished", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}
