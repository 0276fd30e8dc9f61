use dotenv::dotenv;
use multidispatch::errors::Error;
use multidispatch::errors::Error::Platform;
use multidispatch::example::example_class;
use multidispatch::value::{number, string};
use multidispatch::{Value, register_multi_method, wrap_with_multi_dispatch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| Platform(e.to_string()))?;

    let calls: Vec<Vec<Value>> = vec![
        vec![number(1), number(2)],
        vec![string("x"), number(5)],
        vec![string("x"), string("x")],
    ];

    let class = example_class()?;

    info!("-- wrapped instance --");
    let wrapped = wrap_with_multi_dispatch(class.instantiate());
    for args in &calls {
        report(args, wrapped.call("a", args.clone()));
    }
    info!("members: {:?}", wrapped.target().member_names());

    info!("-- class-wide dispatcher --");
    register_multi_method(&class, "a")?;
    let instance = class.instantiate();
    for args in &calls {
        report(args, instance.call("a", args.clone()));
    }
    info!("members: {:?}", instance.member_names());
    Ok(())
}

fn report(args: &[Value], result: Result<Value, multidispatch::errors::RuntimeError>) {
    let args = Value::List(args.to_vec());
    match result {
        Ok(value) => info!("a({}) = {}", args, value),
        Err(e) => warn!("a({}) failed: {}", args, e),
    }
}
