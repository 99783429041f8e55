use simplyioc_di::container::Container;
use simplyioc_di::injection::Injected;
use simplyioc_di::instance_provider::ComponentInstancePtr;
use simplyioc_di::{component_impl, Component};

// fields marked with #[inject] are populated after all components exist, so components can
// depend on each other, which is not possible with constructors
#[derive(Component)]
struct Ping {
    #[inject]
    pong: Injected<Pong>,
}

#[derive(Component)]
struct Pong {
    #[inject]
    ping: Injected<Ping>,
    // initialized with a custom expression in the zero-argument constructor
    #[component(default = "initial_hits")]
    hits: u32,
    // populated by an injection method
    logger: Injected<Logger>,
}

fn initial_hits() -> u32 {
    3
}

#[derive(Component)]
struct Logger;

impl Logger {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

#[component_impl]
impl Pong {
    // injection methods are called after fields are injected
    #[inject]
    fn set_logger(&self, logger: ComponentInstancePtr<Logger>) {
        self.logger.set(&logger);
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = Container::new::<Ping>(&[]).expect("error creating container");

    let ping = container.bean::<Ping>().expect("missing Ping");
    let pong = ping.pong.get().expect("Pong not injected");
    let logger = pong.logger.get().expect("Logger not injected");

    // injected fields hold the same instances as the container
    assert!(ComponentInstancePtr::ptr_eq(
        &pong.ping.get().expect("Ping not injected"),
        &ping
    ));

    logger.log(&format!("Pong got {} hits", pong.hits));
}
