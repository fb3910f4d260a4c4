// cache_level.rs
//
// One level in the hierarchy: validates policy, services byte reads and
// writes, handles hit/miss accounting, performs fill and writeback through
// its lower neighbor. Grounded on the teacher's `Cache` struct and its
// `read`/`write`/`load_block`/`write_back_line` methods
// (src/timing_simulator/components.rs), generalized from 4-byte word
// access to a byte-granular, prefetch-aware API.

use std::cell::RefCell;
use std::rc::Rc;

use crate::address;
use crate::block::BlockStorage;
use crate::errors::SimulatorError;
use crate::memory::Memory;
use crate::policy::CachePolicy;
use crate::statistics::Statistics;

pub struct CacheLevel {
    policy: CachePolicy,
    storage: BlockStorage,
    write_back: bool,
    write_allocate: bool,
    reference_counter: u64,
    stats: Statistics,
    next: Option<Box<CacheLevel>>,
    memory: Rc<RefCell<Memory>>,
}

impl CacheLevel {
    pub fn new(
        policy: CachePolicy,
        write_back: bool,
        write_allocate: bool,
        next: Option<Box<CacheLevel>>,
        memory: Rc<RefCell<Memory>>,
    ) -> Self {
        let storage = BlockStorage::new(&policy);
        Self {
            policy,
            storage,
            write_back,
            write_allocate,
            reference_counter: 0,
            stats: Statistics::new(),
            next,
            memory,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn next(&self) -> Option<&CacheLevel> {
        self.next.as_deref()
    }

    /// Pure query: does not increment counters.
    pub fn in_cache(&self, addr: u32) -> Result<bool, SimulatorError> {
        let (tag, set_id, _offset) = address::decompose(&self.policy, addr);
        Ok(self.storage.find_block(set_id, tag)?.is_some())
    }

    pub fn get_byte(
        &mut self,
        addr: u32,
        mut cycles_out: Option<&mut u64>,
        is_prefetch: bool,
    ) -> Result<u8, SimulatorError> {
        self.reference_counter += 1;
        if !is_prefetch {
            self.stats.num_read += 1;
        }

        let (tag, set_id, offset) = address::decompose(&self.policy, addr);

        if let Some(idx) = self.storage.find_block(set_id, tag)? {
            self.stats.num_hit += 1;
            self.stats.total_cycles += self.policy.hit_latency;
            let rc = self.reference_counter;
            let block = self.storage.get_mut(idx);
            block.last_reference = rc;
            let byte = block.data[offset as usize];
            if let Some(c) = cycles_out.as_deref_mut() {
                *c = self.policy.hit_latency;
            }
            return Ok(byte);
        }

        if !is_prefetch {
            self.stats.num_miss += 1;
            self.stats.total_cycles += self.policy.miss_latency;
        }

        self.fill(addr, cycles_out.as_deref_mut(), is_prefetch)?;

        let idx = self.storage.find_block(set_id, tag)?.ok_or_else(|| {
            SimulatorError::InvariantViolation(format!(
                "address 0x{:08X} not resident immediately after fill",
                addr
            ))
        })?;
        let rc = self.reference_counter;
        let block = self.storage.get_mut(idx);
        block.last_reference = rc;
        Ok(block.data[offset as usize])
    }

    /// Demand write; never a prefetch.
    pub fn set_byte(
        &mut self,
        addr: u32,
        value: u8,
        mut cycles_out: Option<&mut u64>,
    ) -> Result<(), SimulatorError> {
        self.reference_counter += 1;
        self.stats.num_write += 1;

        let (tag, set_id, offset) = address::decompose(&self.policy, addr);

        if let Some(idx) = self.storage.find_block(set_id, tag)? {
            self.stats.num_hit += 1;
            self.stats.total_cycles += self.policy.hit_latency;
            self.apply_write(idx, offset, value);

            let mut charged = self.policy.hit_latency;
            if !self.write_back {
                self.propagate_write_through(addr, value)?;
                self.stats.total_cycles += self.policy.miss_latency;
                self.storage.get_mut(idx).modified = false;
                charged += self.policy.miss_latency;
            }
            if let Some(c) = cycles_out.as_deref_mut() {
                *c = charged;
            }
            return Ok(());
        }

        self.stats.num_miss += 1;
        self.stats.total_cycles += self.policy.miss_latency;

        if self.write_allocate {
            self.fill(addr, cycles_out.as_deref_mut(), false)?;
            let idx = self.storage.find_block(set_id, tag)?.ok_or_else(|| {
                SimulatorError::InvariantViolation(format!(
                    "address 0x{:08X} not resident immediately after write-allocate fill",
                    addr
                ))
            })?;
            self.apply_write(idx, offset, value);
            if !self.write_back {
                self.propagate_write_through(addr, value)?;
                self.storage.get_mut(idx).modified = false;
            }
        } else {
            // Write-around: forward without allocating a slot in this level.
            self.propagate_write_through(addr, value)?;
        }

        if let Some(c) = cycles_out.as_deref_mut() {
            *c = self.policy.miss_latency;
        }
        Ok(())
    }

    fn apply_write(&mut self, idx: usize, offset: u64, value: u8) {
        let rc = self.reference_counter;
        let block = self.storage.get_mut(idx);
        block.modified = true;
        block.last_reference = rc;
        block.data[offset as usize] = value;
    }

    fn propagate_write_through(&mut self, addr: u32, value: u8) -> Result<(), SimulatorError> {
        if let Some(next) = self.next.as_deref_mut() {
            next.set_byte(addr, value, None)?;
        } else {
            let memory = self.memory.clone();
            memory.borrow_mut().set_byte_no_cache(addr, value);
        }
        Ok(())
    }

    fn fill(
        &mut self,
        addr: u32,
        mut cycles_out: Option<&mut u64>,
        is_prefetch: bool,
    ) -> Result<(), SimulatorError> {
        let tag = address::tag(&self.policy, addr);
        let set_id = address::set_index(&self.policy, addr);
        let block_addr = address::block_base(&self.policy, addr);
        let block_size = self.policy.block_size;
        let transfer_len = if self.policy.full_block_fill {
            block_size
        } else {
            1
        };

        let mut new_data = vec![0u8; block_size];
        if let Some(next) = self.next.as_deref_mut() {
            for (i, slot) in new_data.iter_mut().enumerate().take(transfer_len) {
                *slot = next.get_byte(
                    block_addr + i as u32,
                    cycles_out.as_deref_mut(),
                    is_prefetch,
                )?;
            }
        } else {
            let memory = self.memory.clone();
            for (i, slot) in new_data.iter_mut().enumerate().take(transfer_len) {
                *slot = memory.borrow_mut().get_byte_no_cache(block_addr + i as u32);
                if let Some(c) = cycles_out.as_deref_mut() {
                    *c += 100;
                }
            }
        }

        let victim_idx = self.storage.choose_victim(set_id);
        let need_writeback = {
            let victim = self.storage.get(victim_idx);
            victim.valid && victim.modified && self.write_back
        };
        if need_writeback {
            self.writeback_block(victim_idx)?;
            if !is_prefetch {
                self.stats.total_cycles += self.policy.miss_latency;
            }
        }

        let victim = self.storage.get_mut(victim_idx);
        victim.valid = true;
        victim.modified = false;
        victim.tag = tag;
        victim.data = new_data;
        Ok(())
    }

    /// Always a demand write at the next level, regardless of how the
    /// eviction that triggered it was caused.
    fn writeback_block(&mut self, idx: usize) -> Result<(), SimulatorError> {
        let block_size = self.policy.block_size;
        let (tag, set_id, data) = {
            let block = self.storage.get(idx);
            (block.tag, block.id as u64, block.data.clone())
        };
        let base_addr = address::addr_of(&self.policy, tag, set_id);

        if let Some(next) = self.next.as_deref_mut() {
            for (i, &byte) in data.iter().enumerate().take(block_size) {
                next.set_byte(base_addr + i as u32, byte, None)?;
            }
        } else {
            let memory = self.memory.clone();
            for (i, &byte) in data.iter().enumerate().take(block_size) {
                memory
                    .borrow_mut()
                    .set_byte_no_cache(base_addr + i as u32, byte);
            }
        }

        self.storage.get_mut(idx).modified = false;
        Ok(())
    }
}
