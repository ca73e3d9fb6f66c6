use std::error::Error;
use std::sync::Arc;

use bindery::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let container = Container::init(AppModule::new("greeter"))?;
    container.get::<App>("app")?.run();

    let quiet = container.derive_child(module::from_fn(|binder| {
        binder.bind("app_name").to_instance("quiet-greeter");
        bind_app(binder);
        binder.extension(extension::from_fn(|editor| {
            for info in editor.providers() {
                if info.has_tag("greeter") && info.name().as_str() != "greeter.english" {
                    editor.remove(info.name().clone());
                }
            }
            Ok(())
        }));
        Ok(())
    }))?;
    quiet.get::<App>("app")?.run();

    Ok(())
}

struct AppModule {
    app_name: &'static str,
}

impl AppModule {
    fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }
}

impl Module for AppModule {
    fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
        binder.bind("app_name").to_instance(self.app_name);
        bind_app(binder);

        binder.bind("greeter.english").to(tagged(
            ["greeter"],
            singleton(depends_on(["logger"], |deps| {
                let logger = deps.get::<Arc<dyn Logger>>("logger")?;
                Ok::<_, InjectorError>(Arc::new(EnglishGreeter::new(Arc::clone(&*logger)))
                    as Arc<dyn Greeter>)
            })),
        ));

        binder.bind("greeter.chinese").to(tagged(
            ["greeter"],
            singleton(depends_on(["logger"], |deps| {
                let logger = deps.get::<Arc<dyn Logger>>("logger")?;
                Ok::<_, InjectorError>(Arc::new(ChineseGreeter::new(Arc::clone(&*logger)))
                    as Arc<dyn Greeter>)
            })),
        ));

        Ok(())
    }
}

/// Binds `logger` and `app` in the current scope, so that a child rebinding
/// `app_name` or removing greeters gets an app of its own.
fn bind_app(binder: &mut dyn Binder) {
    binder.bind("logger").to(singleton(depends_on(["app_name"], |deps| {
        let app_name: Arc<&'static str> = deps.get("app_name")?;
        Ok::<_, InjectorError>(Arc::new(ConsoleLogger::new(*app_name)) as Arc<dyn Logger>)
    })));

    binder.bind("app").to(singleton(raw(|injector, _| {
        let logger = injector.get::<Arc<dyn Logger>>("logger")?;
        let greeters = injector
            .collect_tagged::<Arc<dyn Greeter>>("greeter")?
            .into_iter()
            .map(|greeter| Arc::clone(&*greeter))
            .collect();
        Ok(App::new(Arc::clone(&*logger), greeters))
    })));
}

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger {
    app_name: &'static str,
}

impl ConsoleLogger {
    fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.app_name, message);
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

struct EnglishGreeter {
    logger: Arc<dyn Logger>,
}

impl EnglishGreeter {
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

struct ChineseGreeter {
    logger: Arc<dyn Logger>,
}

impl ChineseGreeter {
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for ChineseGreeter {
    fn greet(&self) {
        self.logger.log("你好世界!");
    }
}

struct App {
    logger: Arc<dyn Logger>,
    greeters: Vec<Arc<dyn Greeter>>,
}

impl App {
    fn new(logger: Arc<dyn Logger>, greeters: Vec<Arc<dyn Greeter>>) -> Self {
        Self { logger, greeters }
    }

    fn run(&self) {
        self.logger.log("Greeting from bindery managed objects:");
        for greeter in &self.greeters {
            greeter.greet();
        }
    }
}
