use std::sync::Arc;

use cortex_kernel::CortexKernel;

#[derive(Clone)]
pub struct AppState {
    pub kernel: Arc<CortexKernel>,
}
