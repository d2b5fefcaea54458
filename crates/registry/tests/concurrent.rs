use std::sync::Arc;

use kshape_core::ResourceKind;
use kshape_registry::{Registry, SharedRegistry};
use kshape_schema::{FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};

fn gadget(n: usize) -> (ResourceKind, SchemaDescriptor) {
    let kind = ResourceKind::new("example.io", "v1", &format!("Gadget{}", n));
    let root = ObjectSchema::resource(&kind.kind).field(FieldDescriptor::optional("size", FieldType::Int32));
    (kind.clone(), SchemaDescriptor::new(kind, root))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_see_builtins_while_a_writer_registers() -> anyhow::Result<()> {
    let shared = Arc::new(SharedRegistry::new(Registry::with_builtins()));

    let mut readers = Vec::new();
    for _ in 0..8 {
        let reg = shared.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..500 {
                let d = reg.resolve("discovery.k8s.io/v1", "EndpointSlice").map_err(anyhow::Error::from)?;
                anyhow::ensure!(d.kind().kind == "EndpointSlice");
                tokio::task::yield_now().await;
            }
            Ok::<_, anyhow::Error>(())
        }));
    }

    let writer = {
        let reg = shared.clone();
        tokio::spawn(async move {
            for n in 0..50 {
                let (kind, d) = gadget(n);
                reg.register(kind, d).map_err(anyhow::Error::from)?;
                tokio::task::yield_now().await;
            }
            Ok::<_, anyhow::Error>(())
        })
    };

    for r in readers {
        r.await??;
    }
    writer.await??;

    let snap = shared.load();
    assert_eq!(snap.len(), 8 + 50 * 2);
    assert!(snap.resolve("example.io/v1", "Gadget49List").is_ok());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writers_register_each_kind_exactly_once() -> anyhow::Result<()> {
    let shared = Arc::new(SharedRegistry::new(Registry::new()));

    let mut writers = Vec::new();
    for _ in 0..4 {
        let reg = shared.clone();
        writers.push(tokio::spawn(async move {
            let mut won = 0usize;
            for n in 0..20 {
                let (kind, d) = gadget(n);
                if reg.register(kind, d).is_ok() {
                    won += 1;
                }
                tokio::task::yield_now().await;
            }
            won
        }));
    }

    let mut total = 0;
    for w in writers {
        total += w.await?;
    }
    assert_eq!(total, 20);
    assert_eq!(shared.load().len(), 40);
    Ok(())
}
