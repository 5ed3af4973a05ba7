use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::base::build_base;
use crate::derive::derive;
use crate::kernel_ext::KernelBundle;
use crate::layout::{plan_slots, plan_symbols};
use crate::params::InputParameters;
use crate::slot::cut_slot;
use crate::symbol::emboss_symbol;
use crate::types::{Composition, Diagnostics, ModelError};

/// Build the complete holder.
///
/// Every configuration check runs before the first kernel call. The base is
/// then cut slot by slot and embossed symbol by symbol, each step consuming
/// the previous solid. The first failure aborts with nothing left allocated.
#[instrument(skip_all, fields(slots = params.slot_count))]
pub fn compose(
    kb: &mut dyn KernelBundle,
    params: &InputParameters,
) -> Result<Composition, ModelError> {
    let dims = derive(params)?;
    let slots = plan_slots(params, &dims);
    let plan = plan_symbols(params, &dims, &slots)?;
    for warning in &plan.warnings {
        warn!("{}", warning);
    }
    info!(
        length = dims.base_length,
        width = dims.base_width,
        height = dims.base_height,
        "dimensions derived"
    );

    let start = Instant::now();
    let mut acc = build_base(kb, &dims, params)?;
    for slot in &slots {
        acc = cut_slot(kb, acc, slot, &dims)?;
    }
    for symbol in &plan.symbols {
        acc = emboss_symbol(kb, acc, symbol, &dims, params)?;
    }

    let shells = kb.as_introspect().shell_count(&acc);
    if shells != 1 {
        kb.release(acc);
        return Err(ModelError::Disconnected { shells });
    }
    let kernel_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(kernel_time_ms, "holder composed");

    Ok(Composition {
        solid: acc,
        dims,
        slots,
        symbols: plan.symbols,
        diagnostics: Diagnostics {
            warnings: plan.warnings,
            kernel_time_ms,
        },
    })
}
