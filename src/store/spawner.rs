use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

/// Host executor for the deferred part of asynchronous reducers.
///
/// The store never polls deferred work itself. It hands each task over as
/// soon as the reducer that produced it returns.
pub trait Spawner {
    fn schedule(&self, task: LocalBoxFuture<'static, ()>) -> anyhow::Result<()>;
}

impl Spawner for LocalSpawner {
    fn schedule(&self, task: LocalBoxFuture<'static, ()>) -> anyhow::Result<()> {
        self.spawn_local(task)?;
        Ok(())
    }
}
